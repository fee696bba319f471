//! A [`SequenceStore`] of unique keys kept in lockstep with its [`LookupIndex`].
//!
//! All re-indexing for both [`OrderedMap`](`crate::OrderedMap`) and [`OrderedSet`](`crate::OrderedSet`) happens here.

use alloc::vec::Vec;
use core::{borrow::Borrow, slice};
use tap::Pipe;

use crate::{
	lookup_index::{LookupIndex, Shift},
	sequence_store::SequenceStore,
	Equality, Error,
};

#[derive(Debug, Clone)]
pub(crate) struct KeyedSequence<K, E> {
	keys: SequenceStore<K>,
	index: LookupIndex,
	equality: E,
	/// Reported when a key is already present.
	duplicate: Error,
}

impl<K, E> KeyedSequence<K, E> {
	pub(crate) fn new(equality: E, duplicate: Error) -> Self {
		Self {
			keys: SequenceStore::new(),
			index: LookupIndex::new(),
			equality,
			duplicate,
		}
	}

	pub(crate) fn with_capacity(capacity: usize, equality: E, duplicate: Error) -> Self {
		Self {
			keys: SequenceStore::with_capacity(capacity),
			index: LookupIndex::with_capacity(capacity),
			equality,
			duplicate,
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.keys.len()
	}

	pub(crate) fn equality(&self) -> &E {
		&self.equality
	}

	pub(crate) fn get(&self, position: usize) -> Result<&K, Error> {
		self.keys.get(position)
	}

	pub(crate) fn as_slice(&self) -> &[K] {
		self.keys.as_slice()
	}

	pub(crate) fn iter(&self) -> slice::Iter<'_, K> {
		self.keys.iter()
	}

	pub(crate) fn into_vec(self) -> Vec<K> {
		self.keys.into_vec()
	}

	pub(crate) fn clear(&mut self) {
		self.keys.clear();
		self.index.clear();
	}

	/// Moves the key at `from` to `to`. Keys in between shift by one towards `from`.
	pub(crate) fn move_position(&mut self, from: usize, to: usize) -> Result<(), Error> {
		self.keys.move_item(from, to)?;
		self.index.move_position(from, to);
		Ok(())
	}

	/// Keeps exactly the keys whose flag is set. `keep` must be as long as this sequence.
	///
	/// Doesn't call into the equality strategy.
	pub(crate) fn retain_flagged(&mut self, keep: &[bool]) {
		self.keys.retain_flagged(keep);
		self.index.retain_flagged(keep);
	}
}

impl<K, E: Equality<K>> KeyedSequence<K, E> {
	/// `E`'s verdicts on `Q` must agree with those on the corresponding `K`, as for [`Borrow`].
	pub(crate) fn position_of<Q: ?Sized>(&self, key: &Q) -> Option<usize>
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		let Self {
			keys,
			index,
			equality,
			..
		} = self;
		let keys = keys.as_slice();
		index.try_get_position(<E as Equality<Q>>::hash_of(equality, key), |p| {
			<E as Equality<Q>>::equals(equality, <K as Borrow<Q>>::borrow(&keys[p]), key)
		})
	}

	pub(crate) fn contains<Q: ?Sized>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		self.position_of(key).is_some()
	}

	pub(crate) fn reserve(&mut self, additional: usize) {
		let Self {
			keys,
			index,
			equality,
			..
		} = self;
		keys.reserve(additional);
		let keys = keys.as_slice();
		index.reserve(additional, |p| equality.hash_of(&keys[p]));
	}

	/// Appends `key`, returning its position.
	pub(crate) fn push(&mut self, key: K) -> Result<usize, Error> {
		let position = self.len();
		self.insert(position, key).map(|()| position)
	}

	/// Inserts `key` at `position`, shifting later keys up by one.
	///
	/// Appending doesn't touch any existing index records.
	/// `E` is only consulted before the first change, so a panicking strategy leaves this sequence as it was.
	pub(crate) fn insert(&mut self, position: usize, key: K) -> Result<(), Error> {
		let len = self.len();
		if position > len {
			return Err(Error::IndexOutOfRange {
				index: position,
				len,
			});
		}
		if self.contains(&key) {
			return Err(self.duplicate);
		}

		let hash = self.equality.hash_of(&key);
		let Self {
			keys,
			index,
			equality,
			..
		} = self;
		let equality = &*equality;
		index.reserve(1, |p| equality.hash_of(&keys.as_slice()[p]));

		keys.insert_at(position, key)?;
		if position < len {
			index.shift_from(position, Shift::Up);
		}
		index.insert_unique(hash, position, |p| equality.hash_of(&keys.as_slice()[p]));
		Ok(())
	}

	/// Removes the key at `position`, shifting later keys down by one.
	///
	/// Removing the last key doesn't touch any other index records.
	pub(crate) fn remove_at(&mut self, position: usize) -> Result<K, Error> {
		let hash = self.equality.hash_of(self.keys.get(position)?);
		let removed = self.index.remove_position(hash, position);
		debug_assert!(removed, "position {position} wasn't indexed");

		let key = self.keys.remove_at(position)?;
		if position < self.keys.len() {
			self.index.shift_from(position + 1, Shift::Down);
		}
		Ok(key)
	}

	/// Removes `key`, iff present, and reports where it was.
	pub(crate) fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(usize, K)>
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		let position = self.position_of(key)?;
		self.remove_at(position).ok()?.pipe(|key| Some((position, key)))
	}

	/// Replaces the key at `position` with `key`, returning the previous one.
	///
	/// `key` may be equal to the key it replaces, but not to any other present key.
	/// As with [`insert`](`KeyedSequence::insert`), `E` is only consulted before the first change.
	pub(crate) fn replace_at(&mut self, position: usize, key: K) -> Result<K, Error> {
		let old_hash = self.equality.hash_of(self.keys.get(position)?);
		match self.position_of(&key) {
			Some(existing) if existing != position => return Err(self.duplicate),
			_ => (),
		}

		let hash = self.equality.hash_of(&key);
		let Self {
			keys,
			index,
			equality,
			..
		} = self;
		let equality = &*equality;
		index.reserve(1, |p| equality.hash_of(&keys.as_slice()[p]));

		let removed = index.remove_position(old_hash, position);
		debug_assert!(removed, "position {position} wasn't indexed");
		let old = keys.set(position, key)?;
		index.insert_unique(hash, position, |p| equality.hash_of(&keys.as_slice()[p]));
		Ok(old)
	}

	/// Verifies that every key is indexed at exactly its own position.
	pub(crate) fn check_invariants(&self) -> Result<(), Error> {
		let len = self.len();
		if self.index.len() != len {
			return Err(Error::InvalidState {
				position: self.index.len().min(len),
			});
		}
		if let Some(position) = self.index.positions().find(|&p| p >= len) {
			return Err(Error::InvalidState { position });
		}
		match self
			.iter()
			.enumerate()
			.find(|&(p, key)| self.position_of(key) != Some(p))
		{
			Some((position, _)) => Err(Error::InvalidState { position }),
			None => Ok(()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::KeyedSequence;
	use crate::{DefaultEquality, Error};
	use alloc::vec::Vec;

	fn sequence(keys: &[char]) -> KeyedSequence<char, DefaultEquality> {
		let mut sequence = KeyedSequence::new(DefaultEquality::default(), Error::DuplicateKey);
		for &k in keys {
			sequence.push(k).unwrap();
		}
		sequence
	}

	fn positions(sequence: &KeyedSequence<char, DefaultEquality>) -> Vec<Option<usize>> {
		sequence.iter().map(|k| sequence.position_of(k)).collect()
	}

	#[test]
	fn insert_reindexes_tail() {
		let mut s = sequence(&['a', 'b', 'c']);
		s.insert(1, 'x').unwrap();
		assert_eq!(s.as_slice(), ['a', 'x', 'b', 'c']);
		assert_eq!(positions(&s), [Some(0), Some(1), Some(2), Some(3)]);
		s.check_invariants().unwrap();
	}

	#[test]
	fn duplicate_and_range_checks_leave_state_alone() {
		let mut s = sequence(&['a', 'b']);
		assert_eq!(s.insert(0, 'b'), Err(Error::DuplicateKey));
		assert_eq!(
			s.insert(3, 'z'),
			Err(Error::IndexOutOfRange { index: 3, len: 2 })
		);
		assert_eq!(s.as_slice(), ['a', 'b']);
		s.check_invariants().unwrap();
	}

	#[test]
	fn remove_every_position() {
		for at in 0..5 {
			let mut s = sequence(&['a', 'b', 'c', 'd', 'e']);
			let removed = s.remove_at(at).unwrap();
			assert!(!s.contains(&removed));
			s.check_invariants().unwrap();
		}
	}

	#[test]
	fn replace_checks_other_positions_only() {
		let mut s = sequence(&['a', 'b', 'c']);
		assert_eq!(s.replace_at(1, 'b'), Ok('b'));
		assert_eq!(s.replace_at(1, 'c'), Err(Error::DuplicateKey));
		assert_eq!(s.replace_at(1, 'y'), Ok('b'));
		assert_eq!(s.position_of(&'y'), Some(1));
		assert_eq!(s.position_of(&'b'), None);
		s.check_invariants().unwrap();
	}

	#[test]
	fn retain_and_move() {
		let mut s = sequence(&['a', 'b', 'c', 'd']);
		s.retain_flagged(&[true, false, true, true]);
		s.move_position(2, 0).unwrap();
		assert_eq!(s.as_slice(), ['d', 'a', 'c']);
		assert_eq!(positions(&s), [Some(0), Some(1), Some(2)]);
		s.check_invariants().unwrap();
	}
}
