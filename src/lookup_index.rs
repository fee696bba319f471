//! Hash index from keys to their current positions.
//!
//! The table stores positions only. Keys are read back from the backing sequence through caller-supplied closures,
//! so the index never owns (or clones) a key.
//!
//! Every structural change of the backing sequence must be mirrored here **exactly once**:
//!
//! | sequence change          | index update                                   |
//! |--------------------------|------------------------------------------------|
//! | insert at `p`            | [`shift_from(p, Up)`](`LookupIndex::shift_from`), then [`insert_unique`](`LookupIndex::insert_unique`) `p` |
//! | remove at `p`            | [`remove_position(p)`](`LookupIndex::remove_position`), then [`shift_from(p + 1, Down)`](`LookupIndex::shift_from`) |
//! | move `from` → `to`       | [`move_position`](`LookupIndex::move_position`) |
//! | keep by flags            | [`retain_flagged`](`LookupIndex::retain_flagged`) |
//!
//! Each of these is a single pass over the table that touches every stored position at most once.

use alloc::vec::Vec;
use hashbrown::HashTable;
use tracing::trace;

/// Direction of a [`LookupIndex::shift_from`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shift {
	/// An item was inserted before the affected positions.
	Up,
	/// An item was removed before the affected positions.
	Down,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LookupIndex {
	table: HashTable<usize>,
}

impl LookupIndex {
	pub(crate) fn new() -> Self {
		Self {
			table: HashTable::new(),
		}
	}

	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Self {
			table: HashTable::with_capacity(capacity),
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.table.len()
	}

	/// Finds the position whose key hashes to `hash` and satisfies `is_match`.
	pub(crate) fn try_get_position(
		&self,
		hash: u64,
		mut is_match: impl FnMut(usize) -> bool,
	) -> Option<usize> {
		self.table.find(hash, |&p| is_match(p)).copied()
	}

	/// Records `position` for a key hashing to `hash`.
	///
	/// The caller must already have established that no equal key is indexed.
	/// Only `rehash` is called, and only if the table grows, so [`reserve`](`LookupIndex::reserve`) first
	/// to keep user hashing out of a half-applied mutation.
	pub(crate) fn insert_unique(&mut self, hash: u64, position: usize, rehash: impl Fn(usize) -> u64) {
		self.table.insert_unique(hash, position, |&p| rehash(p));
	}

	/// Makes room for `additional` more records, so that [`insert_unique`](`LookupIndex::insert_unique`) won't need to rehash for them.
	pub(crate) fn reserve(&mut self, additional: usize, rehash: impl Fn(usize) -> u64) {
		self.table.reserve(additional, |&p| rehash(p))
	}

	/// Removes the record of the key that hashes to `hash` and satisfies `is_match`, returning its position.
	pub(crate) fn remove(
		&mut self,
		hash: u64,
		mut is_match: impl FnMut(usize) -> bool,
	) -> Option<usize> {
		self.table
			.find_entry(hash, |&p| is_match(p))
			.ok()
			.map(|occupied| occupied.remove().0)
	}

	/// Removes the record pointing at `position`, given the hash of the key stored there.
	pub(crate) fn remove_position(&mut self, hash: u64, position: usize) -> bool {
		self.remove(hash, |p| p == position).is_some()
	}

	/// Moves every recorded position `>= start` by one in `direction`.
	///
	/// Call this with [`Shift::Up`] *after* inserting into the sequence at `start` but *before* indexing the new key there,
	/// and with [`Shift::Down`] (and `start = removed + 1`) *after* the removed key's record is gone.
	///
	/// Returns how many records were moved.
	pub(crate) fn shift_from(&mut self, start: usize, direction: Shift) -> usize {
		let mut moved = 0;
		for p in self.table.iter_mut().filter(|p| **p >= start) {
			match direction {
				Shift::Up => *p += 1,
				Shift::Down => {
					debug_assert!(*p > 0, "shifted position 0 down");
					*p -= 1
				}
			}
			moved += 1;
		}
		trace!(start, ?direction, moved, "shifted lookup index");
		moved
	}

	/// Re-points records after the sequence moved its item at `from` to `to`.
	pub(crate) fn move_position(&mut self, from: usize, to: usize) {
		if from == to {
			return;
		}
		for p in self.table.iter_mut() {
			*p = match *p {
				q if q == from => to,
				q if from < to && (from + 1..=to).contains(&q) => q - 1,
				q if to < from && (to..from).contains(&q) => q + 1,
				q => q,
			}
		}
		trace!(from, to, "moved position in lookup index");
	}

	/// Drops records whose flag is `false` and renumbers the rest densely, preserving their relative order.
	pub(crate) fn retain_flagged(&mut self, keep: &[bool]) {
		let mut renumbered = Vec::with_capacity(keep.len());
		let mut next = 0;
		for &kept in keep {
			renumbered.push(next);
			next += usize::from(kept);
		}

		self.table.retain(|p| {
			let kept = keep.get(*p).copied().unwrap_or(false);
			if kept {
				*p = renumbered[*p];
			}
			kept
		});
		trace!(remaining = next, "compacted lookup index");
	}

	pub(crate) fn clear(&mut self) {
		self.table.clear()
	}

	/// Every recorded position, in table order.
	pub(crate) fn positions(&self) -> impl '_ + Iterator<Item = usize> {
		self.table.iter().copied()
	}
}

#[cfg(test)]
mod tests {
	use super::{LookupIndex, Shift};
	use alloc::vec::Vec;

	/// Identity hashing: position `p` holds key `keys[p]`, hashed as itself.
	fn indexed(keys: &[u64]) -> LookupIndex {
		let mut index = LookupIndex::new();
		for (p, &k) in keys.iter().enumerate() {
			index.insert_unique(k, p, |q| keys[q]);
		}
		index
	}

	fn assert_consistent(index: &LookupIndex, keys: &[u64]) {
		assert_eq!(index.len(), keys.len());
		for (p, &k) in keys.iter().enumerate() {
			assert_eq!(index.try_get_position(k, |q| keys[q] == k), Some(p));
		}
	}

	#[test]
	fn growth_rehashes_existing_positions() {
		let keys: Vec<u64> = (0..100).map(|k| k * 31).collect();
		let mut index = LookupIndex::new();
		for (p, &k) in keys.iter().enumerate() {
			index.insert_unique(k, p, |q| keys[q]);
		}
		assert_consistent(&index, &keys);
	}

	#[test]
	fn shift_up_every_insert_position() {
		for n in 0..8_u64 {
			for at in 0..=n as usize {
				let mut keys: Vec<u64> = (0..n).collect();
				let mut index = indexed(&keys);

				keys.insert(at, 100);
				assert_eq!(index.shift_from(at, Shift::Up), n as usize - at);
				index.insert_unique(100, at, |q| keys[q]);
				assert_consistent(&index, &keys);
			}
		}
	}

	#[test]
	fn shift_down_every_remove_position() {
		for n in 1..8_u64 {
			for at in 0..n as usize {
				let mut keys: Vec<u64> = (0..n).collect();
				let mut index = indexed(&keys);

				assert!(index.remove_position(keys[at], at));
				keys.remove(at);
				assert_eq!(index.shift_from(at + 1, Shift::Down), keys.len() - at);
				assert_consistent(&index, &keys);
			}
		}
	}

	#[test]
	fn move_every_pair() {
		let n = 6_u64;
		for from in 0..n as usize {
			for to in 0..n as usize {
				let mut keys: Vec<u64> = (0..n).collect();
				let mut index = indexed(&keys);

				let k = keys.remove(from);
				keys.insert(to, k);
				index.move_position(from, to);
				assert_consistent(&index, &keys);
			}
		}
	}

	#[test]
	fn retain_renumbers_densely() {
		let mut keys: Vec<u64> = (0..6).collect();
		let mut index = indexed(&keys);
		let keep = [false, true, true, false, false, true];

		index.retain_flagged(&keep);
		let mut flags = keep.iter();
		keys.retain(|_| *flags.next().unwrap());
		assert_eq!(keys, [1, 2, 5]);
		assert_consistent(&index, &keys);
	}
}
