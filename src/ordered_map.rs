//! An insertion-ordered hash map with positional access.

use alloc::vec::{self, Vec};
use core::{
	borrow::Borrow,
	fmt::{self, Debug},
	iter::Zip,
	mem,
	ops::Index,
	slice,
};
use tap::Tap;
use tracing::debug;

use crate::{
	keyed_sequence::KeyedSequence, sequence_store::SequenceStore, DefaultEquality, Equality, Error,
};

/// A hash map that remembers the order of its entries and can be indexed by position.
///
/// Keys are unique (according to `E`), values may repeat.
/// New entries are appended unless inserted at an explicit position.
/// Positions are dense: removing the entry at position `p` moves every later entry down by one.
///
/// Keys and values are kept in two parallel sequences,
/// alongside a hash index from key to current position.
///
/// ```
/// use ordered_index::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.add("a", 1)?;
/// map.add("b", 2)?;
/// map.add("c", 3)?;
///
/// map.insert(1, "x", 9)?;
/// assert_eq!(map.keys(), ["a", "x", "b", "c"]);
/// assert_eq!(map.get_by_key(&"x"), Ok(&9));
/// assert_eq!(map.try_get_position_by_key(&"b"), Some(2));
///
/// assert!(map.remove(&"x"));
/// assert_eq!(map.keys(), ["a", "b", "c"]);
/// assert_eq!(map.try_get_position_by_key(&"b"), Some(1));
/// # Ok::<(), ordered_index::Error>(())
/// ```
///
/// # Mutation During Iteration
///
/// The borrow checker rules this out for all iterators here.
/// Positions obtained earlier are **not** tracked, though, and go stale after any structural change.
#[derive(Clone)]
pub struct OrderedMap<K, V, E = DefaultEquality> {
	keys: KeyedSequence<K, E>,
	values: SequenceStore<V>,
}

impl<K, V> OrderedMap<K, V> {
	/// Creates a new, empty [`OrderedMap`] using [`DefaultEquality`].
	#[must_use]
	pub fn new() -> Self {
		Self::with_equality(DefaultEquality::default())
	}

	/// Creates a new, empty [`OrderedMap`] using [`DefaultEquality`] that can hold `capacity` entries without reallocating.
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self::with_capacity_and_equality(capacity, DefaultEquality::default())
	}
}

impl<K: Eq + core::hash::Hash, V> OrderedMap<K, V> {
	/// Creates an [`OrderedMap`] from `seed`, in order.
	///
	/// Only the **first** occurrence of each key is kept. Later duplicates (and their values) are dropped.
	pub fn from_seed(seed: impl IntoIterator<Item = (K, V)>) -> Self {
		Self::from_seed_with_equality(seed, DefaultEquality::default())
	}
}

impl<K, V, E> OrderedMap<K, V, E> {
	/// Creates a new, empty [`OrderedMap`] that compares and hashes keys through `equality`.
	pub fn with_equality(equality: E) -> Self {
		Self {
			keys: KeyedSequence::new(equality, Error::DuplicateKey),
			values: SequenceStore::new(),
		}
	}

	/// Creates a new, empty [`OrderedMap`] that compares and hashes keys through `equality`
	/// and can hold `capacity` entries without reallocating.
	pub fn with_capacity_and_equality(capacity: usize, equality: E) -> Self {
		Self {
			keys: KeyedSequence::with_capacity(capacity, equality, Error::DuplicateKey),
			values: SequenceStore::with_capacity(capacity),
		}
	}

	/// The equality strategy this map was created with.
	pub fn equality(&self) -> &E {
		self.keys.equality()
	}

	/// The number of entries.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	/// Whether there are no entries.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Removes all entries.
	pub fn clear(&mut self) {
		debug!(cleared = self.len(), "clearing ordered map");
		self.keys.clear();
		self.values.clear();
	}

	/// A snapshot of the keys, in order.
	///
	/// The returned [`Vec`] is disconnected from this map.
	#[must_use]
	pub fn keys(&self) -> Vec<K>
	where
		K: Clone,
	{
		self.keys.as_slice().to_vec()
	}

	/// A snapshot of the values, in order.
	///
	/// The returned [`Vec`] is disconnected from this map.
	#[must_use]
	pub fn values(&self) -> Vec<V>
	where
		V: Clone,
	{
		self.values.as_slice().to_vec()
	}

	/// Iterates over the entries in position order.
	pub fn iter(&self) -> Iter<'_, K, V> {
		Iter {
			inner: self.keys.iter().zip(self.values.iter()),
		}
	}

	/// Iterates over the entries in position order, with mutable access to values.
	pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
		IterMut {
			inner: self.keys.iter().zip(self.values.iter_mut()),
		}
	}

	/// Retrieves the key at `position`, iff in range.
	pub fn try_get_key(&self, position: usize) -> Option<&K> {
		self.keys.get(position).ok()
	}

	/// Retrieves the value at `position`, iff in range.
	pub fn try_get_value(&self, position: usize) -> Option<&V> {
		self.values.get(position).ok()
	}

	/// Retrieves the entry at `position`, iff in range.
	pub fn get_entry(&self, position: usize) -> Option<(&K, &V)> {
		Some((self.try_get_key(position)?, self.try_get_value(position)?))
	}

	/// The first entry, iff any.
	pub fn first(&self) -> Option<(&K, &V)> {
		self.get_entry(0)
	}

	/// The last entry, iff any.
	pub fn last(&self) -> Option<(&K, &V)> {
		self.len().checked_sub(1).and_then(|p| self.get_entry(p))
	}

	/// Retrieves the value at `position`.
	///
	/// # Errors
	///
	/// [`Error::IndexOutOfRange`] iff `position >= len`.
	pub fn get_by_position(&self, position: usize) -> Result<&V, Error> {
		self.values.get(position)
	}

	/// Retrieves the value at `position` mutably.
	///
	/// # Errors
	///
	/// [`Error::IndexOutOfRange`] iff `position >= len`.
	pub fn get_by_position_mut(&mut self, position: usize) -> Result<&mut V, Error> {
		self.values.get_mut(position)
	}

	/// Replaces the value at `position`, returning the previous one. Key order is unaffected.
	///
	/// # Errors
	///
	/// [`Error::IndexOutOfRange`] iff `position >= len`.
	pub fn set_by_position(&mut self, position: usize, value: V) -> Result<V, Error> {
		self.values.set(position, value)
	}

	/// Moves the entry at `from` to `to`. Entries in between shift by one position towards `from`.
	///
	/// # Errors
	///
	/// [`Error::IndexOutOfRange`] iff either position is `>= len`.
	pub fn move_position(&mut self, from: usize, to: usize) -> Result<(), Error> {
		self.keys.move_position(from, to)?;
		self.values.move_item(from, to)
	}

	/// Keeps only the entries for which `keep` returns `true`. Survivors keep their relative order.
	///
	/// `keep` is called once per entry, in position order.
	/// If it panics, the entries it already rejected are removed and all others are kept.
	pub fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
		let flags = Vec::with_capacity(self.len());
		let mut pending = scopeguard::guard((self, flags), |(this, mut flags)| {
			flags.resize(this.len(), true);
			let removed = flags.iter().filter(|kept| !**kept).count();
			if removed > 0 {
				debug!(removed, "removing rejected ordered map entries");
				this.keys.retain_flagged(&flags);
				this.values.retain_flagged(&flags);
			}
		});

		let (this, flags) = &mut *pending;
		for (k, v) in this.keys.iter().zip(this.values.iter_mut()) {
			flags.push(keep(k, v));
		}
	}

	/// Finds the first position holding a value equal to `value`.
	///
	/// This is a linear scan. There is no reverse index.
	pub fn try_get_position_by_value(&self, value: &V) -> Option<usize>
	where
		V: PartialEq,
	{
		self.values.iter().position(|v| v == value)
	}

	/// Whether any entry holds a value equal to `value`. Linear.
	pub fn contains_value(&self, value: &V) -> bool
	where
		V: PartialEq,
	{
		self.try_get_position_by_value(value).is_some()
	}
}

/// Key lookups accept any borrowed form `Q` of `K` that `E` can compare, like [`str`] for [`String`](`alloc::string::String`) keys.
/// `E` must treat a `Q` exactly like the `K` it was borrowed from.
impl<K, V, E: Equality<K>> OrderedMap<K, V, E> {
	/// Creates an [`OrderedMap`] from `seed`, in order, comparing and hashing keys through `equality`.
	///
	/// Only the **first** occurrence of each key is kept. Later duplicates (and their values) are dropped.
	pub fn from_seed_with_equality(seed: impl IntoIterator<Item = (K, V)>, equality: E) -> Self {
		let seed = seed.into_iter();
		Self::with_capacity_and_equality(seed.size_hint().0, equality).tap_mut(|map| {
			let dropped = map.extend_first_wins(seed);
			if dropped > 0 {
				debug!(dropped, "dropped duplicate keys from ordered map seed");
			}
		})
	}

	/// Adds all entries with new keys, returning how many were skipped.
	fn extend_first_wins(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> usize {
		let entries = entries.into_iter();
		self.reserve(entries.size_hint().0);
		entries
			.filter_map(|(key, value)| self.add(key, value).err())
			.count()
	}

	/// Reserves room for at least `additional` more entries.
	pub fn reserve(&mut self, additional: usize) {
		self.keys.reserve(additional);
		self.values.reserve(additional);
	}

	/// Appends a new entry, returning its position.
	///
	/// # Errors
	///
	/// [`Error::DuplicateKey`] iff an equal key is already present. The map is unchanged in that case.
	pub fn add(&mut self, key: K, value: V) -> Result<usize, Error> {
		let position = self.keys.push(key)?;
		self.values.push(value);
		Ok(position)
	}

	/// Inserts a new entry at `position`, moving every later entry up by one.
	///
	/// # Errors
	///
	/// - [`Error::IndexOutOfRange`] iff `position > len`.
	/// - [`Error::DuplicateKey`] iff an equal key is already present.
	///
	/// The map is unchanged in either case.
	pub fn insert(&mut self, position: usize, key: K, value: V) -> Result<(), Error> {
		self.keys.insert(position, key)?;
		self.values.insert_at(position, value)
	}

	/// Whether an entry with a key equal to `key` is present.
	pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		self.keys.contains(key)
	}

	/// The current position of `key`, iff present.
	pub fn try_get_position_by_key<Q: ?Sized>(&self, key: &Q) -> Option<usize>
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		self.keys.position_of(key)
	}

	/// Retrieves the value associated with `key`, iff present.
	pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		self.values.get(self.keys.position_of(key)?).ok()
	}

	/// Retrieves the value associated with `key` mutably, iff present.
	pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		self.values.get_mut(self.keys.position_of(key)?).ok()
	}

	/// Retrieves the value associated with `key`.
	///
	/// # Errors
	///
	/// [`Error::KeyNotFound`] iff no equal key is present.
	pub fn get_by_key<Q: ?Sized>(&self, key: &Q) -> Result<&V, Error>
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		self.get(key).ok_or(Error::KeyNotFound)
	}

	/// Associates `value` with `key`.
	///
	/// If `key` is present, its value is replaced in place (its position doesn't change) and the previous value is returned.
	/// Otherwise, this appends a new entry exactly like [`add`](`OrderedMap::add`), at the new last position.
	pub fn set_by_key(&mut self, key: K, value: V) -> Option<V> {
		if let Some(position) = self.keys.position_of(&key) {
			self.values
				.get_mut(position)
				.ok()
				.map(|slot| mem::replace(slot, value))
		} else {
			let added = self.add(key, value);
			debug_assert!(added.is_ok(), "absent key was rejected: {added:?}");
			None
		}
	}

	/// Removes the entry for `key`. Returns `false` (and does nothing else) iff it wasn't present.
	pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		self.remove_entry(key).is_some()
	}

	/// Removes the entry for `key` and returns its value, iff present.
	pub fn take<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		self.remove_entry(key).map(|(_, value)| value)
	}

	/// Removes the entry for `key` and returns it, iff present.
	pub fn remove_entry<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
	where
		K: Borrow<Q>,
		E: Equality<Q>,
	{
		let (position, key) = self.keys.remove(key)?;
		let value = self.values.remove_at(position).ok()?;
		Some((key, value))
	}

	/// Removes the entry at `position` and returns it, moving every later entry down by one.
	///
	/// # Errors
	///
	/// [`Error::IndexOutOfRange`] iff `position >= len`.
	pub fn remove_at(&mut self, position: usize) -> Result<(K, V), Error> {
		let key = self.keys.remove_at(position)?;
		let value = self.values.remove_at(position)?;
		Ok((key, value))
	}

	/// Verifies that the key index, key sequence and value sequence agree with each other.
	///
	/// # Errors
	///
	/// [`Error::InvalidState`] iff they don't, which would be a bug in this crate or in `E`.
	pub fn check_invariants(&self) -> Result<(), Error> {
		self.keys.check_invariants()?;
		if self.values.len() == self.keys.len() {
			Ok(())
		} else {
			Err(Error::InvalidState {
				position: self.values.len().min(self.keys.len()),
			})
		}
	}
}

impl<K, V, E: Default> Default for OrderedMap<K, V, E> {
	fn default() -> Self {
		Self::with_equality(E::default())
	}
}

impl<K: Debug, V: Debug, E> Debug for OrderedMap<K, V, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

/// Order-sensitive: maps with the same entries in different orders are **not** equal.
impl<K: PartialEq, V: PartialEq, E, E2> PartialEq<OrderedMap<K, V, E2>> for OrderedMap<K, V, E> {
	fn eq(&self, other: &OrderedMap<K, V, E2>) -> bool {
		self.keys.as_slice() == other.keys.as_slice()
			&& self.values.as_slice() == other.values.as_slice()
	}
}

impl<K: Eq, V: Eq, E> Eq for OrderedMap<K, V, E> {}

/// Positional access.
///
/// # Panics
///
/// Iff `position >= len`.
impl<K, V, E> Index<usize> for OrderedMap<K, V, E> {
	type Output = V;

	fn index(&self, position: usize) -> &V {
		&self.values.as_slice()[position]
	}
}

impl<K, V, E: Equality<K> + Default> FromIterator<(K, V)> for OrderedMap<K, V, E> {
	/// Keeps the first occurrence of each key.
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::from_seed_with_equality(iter, E::default())
	}
}

/// Entries whose key is already present are skipped.
impl<K, V, E: Equality<K>> Extend<(K, V)> for OrderedMap<K, V, E> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		self.extend_first_wins(iter);
	}
}

impl<'a, K, V, E> IntoIterator for &'a OrderedMap<K, V, E> {
	type Item = (&'a K, &'a V);
	type IntoIter = Iter<'a, K, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<'a, K, V, E> IntoIterator for &'a mut OrderedMap<K, V, E> {
	type Item = (&'a K, &'a mut V);
	type IntoIter = IterMut<'a, K, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter_mut()
	}
}

impl<K, V, E> IntoIterator for OrderedMap<K, V, E> {
	type Item = (K, V);
	type IntoIter = IntoIter<K, V>;

	fn into_iter(self) -> Self::IntoIter {
		IntoIter {
			inner: self
				.keys
				.into_vec()
				.into_iter()
				.zip(self.values.into_vec()),
		}
	}
}

/// Iterator over `(&K, &V)` in position order. See [`OrderedMap::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<'a, K, V> {
	inner: Zip<slice::Iter<'a, K>, slice::Iter<'a, V>>,
}
forward_iterator!(Iter<'a, K, V> => (&'a K, &'a V));

/// Iterator over `(&K, &mut V)` in position order. See [`OrderedMap::iter_mut`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K, V> {
	inner: Zip<slice::Iter<'a, K>, slice::IterMut<'a, V>>,
}
forward_iterator!(IterMut<'a, K, V> => (&'a K, &'a mut V));

/// Owning iterator over `(K, V)` in position order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoIter<K, V> {
	inner: Zip<vec::IntoIter<K>, vec::IntoIter<V>>,
}
forward_iterator!(IntoIter<K, V> => (K, V));
