//! Dense, order-stable, randomly indexable storage.

use alloc::vec::Vec;
use core::{mem, slice};

use crate::Error;

/// A dense sequence. Insertion and removal shift every later position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SequenceStore<T> {
	items: Vec<T>,
}

impl<T> Default for SequenceStore<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> SequenceStore<T> {
	pub(crate) const fn new() -> Self {
		Self { items: Vec::new() }
	}

	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Self {
			items: Vec::with_capacity(capacity),
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.items.len()
	}

	fn out_of_range(&self, index: usize) -> Error {
		Error::IndexOutOfRange {
			index,
			len: self.len(),
		}
	}

	pub(crate) fn get(&self, position: usize) -> Result<&T, Error> {
		self.items
			.get(position)
			.ok_or_else(|| self.out_of_range(position))
	}

	pub(crate) fn get_mut(&mut self, position: usize) -> Result<&mut T, Error> {
		let len = self.len();
		self.items
			.get_mut(position)
			.ok_or(Error::IndexOutOfRange {
				index: position,
				len,
			})
	}

	/// Replaces the item at `position`, returning the previous one.
	pub(crate) fn set(&mut self, position: usize, value: T) -> Result<T, Error> {
		self.get_mut(position)
			.map(|slot| mem::replace(slot, value))
	}

	pub(crate) fn push(&mut self, value: T) {
		self.items.push(value)
	}

	pub(crate) fn insert_at(&mut self, position: usize, value: T) -> Result<(), Error> {
		if position > self.len() {
			return Err(self.out_of_range(position));
		}
		self.items.insert(position, value);
		Ok(())
	}

	pub(crate) fn remove_at(&mut self, position: usize) -> Result<T, Error> {
		if position >= self.len() {
			return Err(self.out_of_range(position));
		}
		Ok(self.items.remove(position))
	}

	/// Moves the item at `from` to `to`, shifting the ones in between by one.
	pub(crate) fn move_item(&mut self, from: usize, to: usize) -> Result<(), Error> {
		let len = self.len();
		for position in [from, to] {
			if position >= len {
				return Err(self.out_of_range(position));
			}
		}
		if from < to {
			self.items[from..=to].rotate_left(1)
		} else {
			self.items[to..=from].rotate_right(1)
		}
		Ok(())
	}

	pub(crate) fn clear(&mut self) {
		self.items.clear()
	}

	pub(crate) fn reserve(&mut self, additional: usize) {
		self.items.reserve(additional)
	}

	pub(crate) fn as_slice(&self) -> &[T] {
		&self.items
	}

	pub(crate) fn iter(&self) -> slice::Iter<'_, T> {
		self.items.iter()
	}

	pub(crate) fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
		self.items.iter_mut()
	}

	/// Keeps only items whose `keep` flag is set, in order.
	///
	/// `keep` must have exactly one flag per item.
	pub(crate) fn retain_flagged(&mut self, keep: &[bool]) {
		debug_assert_eq!(keep.len(), self.len());
		let mut flags = keep.iter();
		self.items.retain(|_| flags.next().copied().unwrap_or(true))
	}

	pub(crate) fn into_vec(self) -> Vec<T> {
		self.items
	}
}
