//! An insertion-ordered hash set with positional access and set algebra.

use alloc::vec::{self, Vec};
use core::{
	borrow::Borrow,
	fmt::{self, Debug},
	ops::Index,
	slice,
};
use tap::{Pipe, Tap};
use tracing::debug;

use crate::{keyed_sequence::KeyedSequence, DefaultEquality, Equality, Error};

/// A hash set that remembers the order of its elements and can be indexed by position.
///
/// Elements are unique according to `E`.
///
/// The set algebra methods (`*_with`, `is_*_of`, [`set_equals`](`OrderedSet::set_equals`), [`overlaps`](`OrderedSet::overlaps`))
/// treat `self` as the left operand and accept any sequence as the right one.
/// That sequence may contain duplicates, which count once.
///
/// ```
/// use ordered_index::OrderedSet;
///
/// let mut set: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
/// set.symmetric_except_with([2, 3, 4]);
/// assert_eq!(set.as_slice(), [1, 4]);
///
/// assert!(set.is_subset_of([4, 1, 7]));
/// assert!(set.set_equals([4, 1, 1]));
/// ```
#[derive(Clone)]
pub struct OrderedSet<T, E = DefaultEquality> {
	elements: KeyedSequence<T, E>,
}

impl<T> OrderedSet<T> {
	/// Creates a new, empty [`OrderedSet`] using [`DefaultEquality`].
	#[must_use]
	pub fn new() -> Self {
		Self::with_equality(DefaultEquality::default())
	}

	/// Creates a new, empty [`OrderedSet`] using [`DefaultEquality`] that can hold `capacity` elements without reallocating.
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self::with_capacity_and_equality(capacity, DefaultEquality::default())
	}
}

impl<T: Eq + core::hash::Hash> OrderedSet<T> {
	/// Creates an [`OrderedSet`] from `seed`, in order. Only the first occurrence of each element is kept.
	pub fn from_seed(seed: impl IntoIterator<Item = T>) -> Self {
		Self::from_seed_with_equality(seed, DefaultEquality::default())
	}
}

impl<T, E> OrderedSet<T, E> {
	/// Creates a new, empty [`OrderedSet`] that compares and hashes elements through `equality`.
	pub fn with_equality(equality: E) -> Self {
		Self {
			elements: KeyedSequence::new(equality, Error::DuplicateElement),
		}
	}

	/// Creates a new, empty [`OrderedSet`] that compares and hashes elements through `equality`
	/// and can hold `capacity` elements without reallocating.
	pub fn with_capacity_and_equality(capacity: usize, equality: E) -> Self {
		Self {
			elements: KeyedSequence::with_capacity(capacity, equality, Error::DuplicateElement),
		}
	}

	/// The equality strategy this set was created with.
	pub fn equality(&self) -> &E {
		self.elements.equality()
	}

	/// The number of elements.
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	/// Whether there are no elements.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Removes all elements.
	pub fn clear(&mut self) {
		debug!(cleared = self.len(), "clearing ordered set");
		self.elements.clear()
	}

	/// The elements, in order.
	pub fn as_slice(&self) -> &[T] {
		self.elements.as_slice()
	}

	/// A snapshot of the elements, in order, disconnected from this set.
	#[must_use]
	pub fn to_vec(&self) -> Vec<T>
	where
		T: Clone,
	{
		self.as_slice().to_vec()
	}

	/// Iterates over the elements in position order.
	pub fn iter(&self) -> Iter<'_, T> {
		Iter {
			inner: self.elements.iter(),
		}
	}

	/// Retrieves the element at `position`, iff in range.
	pub fn try_get(&self, position: usize) -> Option<&T> {
		self.elements.get(position).ok()
	}

	/// Retrieves the element at `position`.
	///
	/// # Errors
	///
	/// [`Error::IndexOutOfRange`] iff `position >= len`.
	pub fn get_by_position(&self, position: usize) -> Result<&T, Error> {
		self.elements.get(position)
	}

	/// The first element, iff any.
	pub fn first(&self) -> Option<&T> {
		self.as_slice().first()
	}

	/// The last element, iff any.
	pub fn last(&self) -> Option<&T> {
		self.as_slice().last()
	}

	/// Moves the element at `from` to `to`. Elements in between shift by one position towards `from`.
	///
	/// # Errors
	///
	/// [`Error::IndexOutOfRange`] iff either position is `>= len`.
	pub fn move_position(&mut self, from: usize, to: usize) -> Result<(), Error> {
		self.elements.move_position(from, to)
	}

	/// Keeps only the elements for which `keep` returns `true`. Survivors keep their relative order.
	///
	/// `keep` is called once per element, in position order.
	/// If it panics, the elements it already rejected are removed and all others are kept.
	pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
		let flags = Vec::with_capacity(self.len());
		let mut pending = scopeguard::guard((self, flags), |(this, mut flags)| {
			flags.resize(this.len(), true);
			this.retain_flagged(&flags);
		});

		let (this, flags) = &mut *pending;
		flags.extend(this.elements.iter().map(&mut keep));
	}

	fn retain_flagged(&mut self, keep: &[bool]) -> usize {
		let removed = keep.iter().filter(|kept| !**kept).count();
		if removed > 0 {
			debug!(removed, "removing ordered set elements");
			self.elements.retain_flagged(keep);
		}
		removed
	}
}

/// Lookups accept any borrowed form `Q` of `T` that `E` can compare, like [`str`] for [`String`](`alloc::string::String`) elements.
/// `E` must treat a `Q` exactly like the `T` it was borrowed from.
impl<T, E: Equality<T>> OrderedSet<T, E> {
	/// Creates an [`OrderedSet`] from `seed`, in order, comparing and hashing elements through `equality`.
	///
	/// Only the first occurrence of each element is kept.
	pub fn from_seed_with_equality(seed: impl IntoIterator<Item = T>, equality: E) -> Self {
		let seed = seed.into_iter();
		Self::with_capacity_and_equality(seed.size_hint().0, equality).tap_mut(|set| {
			let dropped = set.union_with(seed);
			if dropped > 0 {
				debug!(dropped, "dropped duplicate elements from ordered set seed");
			}
		})
	}

	/// Reserves room for at least `additional` more elements.
	pub fn reserve(&mut self, additional: usize) {
		self.elements.reserve(additional)
	}

	/// Whether an element equal to `element` is present.
	pub fn contains<Q: ?Sized>(&self, element: &Q) -> bool
	where
		T: Borrow<Q>,
		E: Equality<Q>,
	{
		self.elements.contains(element)
	}

	/// The current position of `element`, iff present.
	pub fn position_of<Q: ?Sized>(&self, element: &Q) -> Option<usize>
	where
		T: Borrow<Q>,
		E: Equality<Q>,
	{
		self.elements.position_of(element)
	}

	/// Appends `element` iff no equal element is present.
	///
	/// Returns whether `element` was added.
	pub fn add(&mut self, element: T) -> bool {
		self.elements.push(element).is_ok()
	}

	/// Inserts `element` at `position`, moving every later element up by one.
	///
	/// # Errors
	///
	/// - [`Error::IndexOutOfRange`] iff `position > len`.
	/// - [`Error::DuplicateElement`] iff an equal element is already present.
	///
	/// The set is unchanged in either case.
	pub fn insert(&mut self, position: usize, element: T) -> Result<(), Error> {
		self.elements.insert(position, element)
	}

	/// Inserts `elements` as a contiguous run starting at `position`, in order, skipping any that are already present.
	///
	/// Returns how many were inserted.
	///
	/// # Errors
	///
	/// [`Error::IndexOutOfRange`] iff `position > len`, before anything is inserted.
	pub fn insert_range(
		&mut self,
		position: usize,
		elements: impl IntoIterator<Item = T>,
	) -> Result<usize, Error> {
		let len = self.len();
		if position > len {
			return Err(Error::IndexOutOfRange {
				index: position,
				len,
			});
		}

		let mut inserted = 0;
		for element in elements {
			match self.insert(position + inserted, element) {
				Ok(()) => inserted += 1,
				Err(Error::DuplicateElement) => (),
				Err(error) => return Err(error),
			}
		}
		Ok(inserted)
	}

	/// Replaces the element at `position`, returning the previous one.
	///
	/// # Errors
	///
	/// - [`Error::IndexOutOfRange`] iff `position >= len`.
	/// - [`Error::DuplicateElement`] iff `element` equals an element at a **different** position.
	pub fn set_by_position(&mut self, position: usize, element: T) -> Result<T, Error> {
		self.elements.replace_at(position, element)
	}

	/// Removes the element at `position` and returns it, moving every later element down by one.
	///
	/// # Errors
	///
	/// [`Error::IndexOutOfRange`] iff `position >= len`.
	pub fn remove_at(&mut self, position: usize) -> Result<T, Error> {
		self.elements.remove_at(position)
	}

	/// Removes the element equal to `element`. Returns `false` (and does nothing else) iff there was none.
	pub fn remove<Q: ?Sized>(&mut self, element: &Q) -> bool
	where
		T: Borrow<Q>,
		E: Equality<Q>,
	{
		self.take(element).is_some()
	}

	/// Removes the element equal to `element` and returns it, iff present.
	pub fn take<Q: ?Sized>(&mut self, element: &Q) -> Option<T>
	where
		T: Borrow<Q>,
		E: Equality<Q>,
	{
		self.elements.remove(element).map(|(_, element)| element)
	}

	/// Removes each of `elements` that is present. Returns how many were removed.
	pub fn remove_range<B: Borrow<T>>(&mut self, elements: impl IntoIterator<Item = B>) -> usize {
		elements
			.into_iter()
			.filter(|element| self.remove(<B as Borrow<T>>::borrow(element)))
			.count()
	}

	/// Appends each element of `other` that isn't present yet, in `other`'s order.
	///
	/// Returns how many of `other`'s items were **skipped**.
	pub fn union_with(&mut self, other: impl IntoIterator<Item = T>) -> usize {
		let other = other.into_iter();
		self.reserve(other.size_hint().0);
		other
			.map(|element| self.add(element))
			.filter(|&added| !added)
			.count()
	}

	/// Removes every element that doesn't appear in `other`. The remaining elements keep their order.
	pub fn intersect_with<B: Borrow<T>>(&mut self, other: impl IntoIterator<Item = B>) {
		let other: Vec<B> = other.into_iter().collect();
		let keep: Vec<bool> = {
			let other = self.distinct(&other);
			self.iter().map(|element| other.contains(&element)).collect()
		};
		self.retain_flagged(&keep);
	}

	/// Removes every element that appears in `other`.
	pub fn except_with<B: Borrow<T>>(&mut self, other: impl IntoIterator<Item = B>) {
		let other: Vec<B> = other.into_iter().collect();
		let keep: Vec<bool> = {
			let other = self.distinct(&other);
			self.iter()
				.map(|element| !other.contains(&element))
				.collect()
		};
		self.retain_flagged(&keep);
	}

	/// Walks `other` once: each distinct item that's present is removed, each one that's absent is appended.
	///
	/// An element that appears in both operands therefore cancels out,
	/// and the result holds exactly the elements found in one operand only.
	pub fn symmetric_except_with(&mut self, other: impl IntoIterator<Item = T>) {
		let other: Vec<T> = other.into_iter().collect();

		// Decided up front, so that repeats in `other` don't toggle an element twice.
		let plan: Vec<Option<bool>> = {
			let mut seen = OrderedSet::with_capacity_and_equality(other.len(), ByReference(self.equality()));
			other
				.iter()
				.map(|element| seen.add(element).then(|| self.contains(element)))
				.collect()
		};

		let (mut removed, mut appended) = (0_usize, 0_usize);
		for (element, present) in other.into_iter().zip(plan) {
			match present {
				None => (),
				Some(true) => removed += usize::from(self.remove(&element)),
				Some(false) => appended += usize::from(self.add(element)),
			}
		}
		debug!(removed, appended, "applied symmetric difference to ordered set");
	}

	/// Whether every element of `self` appears in `other`.
	pub fn is_subset_of<B: Borrow<T>>(&self, other: impl IntoIterator<Item = B>) -> bool {
		let Overlap { common, .. } = self.overlap(other);
		common == self.len()
	}

	/// Whether every element of `self` appears in `other`, and `other` has further distinct elements.
	pub fn is_proper_subset_of<B: Borrow<T>>(&self, other: impl IntoIterator<Item = B>) -> bool {
		let Overlap { distinct, common } = self.overlap(other);
		common == self.len() && distinct > self.len()
	}

	/// Whether every item of `other` is present in `self`.
	pub fn is_superset_of<B: Borrow<T>>(&self, other: impl IntoIterator<Item = B>) -> bool {
		let Overlap { distinct, common } = self.overlap(other);
		common == distinct
	}

	/// Whether every item of `other` is present in `self`, and `self` has further elements.
	pub fn is_proper_superset_of<B: Borrow<T>>(&self, other: impl IntoIterator<Item = B>) -> bool {
		let Overlap { distinct, common } = self.overlap(other);
		common == distinct && self.len() > distinct
	}

	/// Whether `self` and `other` contain the same distinct elements, disregarding order.
	pub fn set_equals<B: Borrow<T>>(&self, other: impl IntoIterator<Item = B>) -> bool {
		let Overlap { distinct, common } = self.overlap(other);
		common == self.len() && distinct == self.len()
	}

	/// Whether at least one item of `other` is present in `self`.
	pub fn overlaps<B: Borrow<T>>(&self, other: impl IntoIterator<Item = B>) -> bool {
		other
			.into_iter()
			.any(|element| self.contains(<B as Borrow<T>>::borrow(&element)))
	}

	/// Verifies that the lookup index and element sequence agree.
	///
	/// # Errors
	///
	/// [`Error::InvalidState`] iff they don't, which would be a bug in this crate or in `E`.
	pub fn check_invariants(&self) -> Result<(), Error> {
		self.elements.check_invariants()
	}

	/// The distinct items of `other`, under this set's equality.
	fn distinct<'a, B: Borrow<T>>(&'a self, other: &'a [B]) -> OrderedSet<&'a T, ByReference<'a, E>> {
		OrderedSet::from_seed_with_equality(
			other.iter().map(|item| <B as Borrow<T>>::borrow(item)),
			ByReference(self.equality()),
		)
	}

	fn overlap<B: Borrow<T>>(&self, other: impl IntoIterator<Item = B>) -> Overlap {
		let other: Vec<B> = other.into_iter().collect();
		let distinct = self.distinct(&other);
		Overlap {
			distinct: distinct.len(),
			common: distinct
				.iter()
				.filter(|&&element| self.contains(element))
				.count(),
		}
	}
}

/// How a sequence relates to an [`OrderedSet`].
struct Overlap {
	/// Number of distinct items in the sequence.
	distinct: usize,
	/// How many of those are in the set.
	common: usize,
}

/// Applies an [`Equality<T>`] to `&T`.
struct ByReference<'a, E>(&'a E);

impl<T: ?Sized, E: Equality<T>> Equality<&T> for ByReference<'_, E> {
	fn equals(&self, a: &&T, b: &&T) -> bool {
		self.0.equals(a, b)
	}

	fn hash_of(&self, value: &&T) -> u64 {
		self.0.hash_of(value)
	}
}

impl<T, E: Default> Default for OrderedSet<T, E> {
	fn default() -> Self {
		Self::with_equality(E::default())
	}
}

impl<T: Debug, E> Debug for OrderedSet<T, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

/// Order-sensitive. Use [`OrderedSet::set_equals`] to compare contents only.
impl<T: PartialEq, E, E2> PartialEq<OrderedSet<T, E2>> for OrderedSet<T, E> {
	fn eq(&self, other: &OrderedSet<T, E2>) -> bool {
		self.as_slice() == other.as_slice()
	}
}

impl<T: Eq, E> Eq for OrderedSet<T, E> {}

/// Positional access.
///
/// # Panics
///
/// Iff `position >= len`.
impl<T, E> Index<usize> for OrderedSet<T, E> {
	type Output = T;

	fn index(&self, position: usize) -> &T {
		&self.as_slice()[position]
	}
}

impl<T, E: Equality<T> + Default> FromIterator<T> for OrderedSet<T, E> {
	/// Keeps the first occurrence of each element.
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self::from_seed_with_equality(iter, E::default())
	}
}

/// Elements that are already present are skipped.
impl<T, E: Equality<T>> Extend<T> for OrderedSet<T, E> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		self.union_with(iter);
	}
}

impl<'a, T, E> IntoIterator for &'a OrderedSet<T, E> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<T, E> IntoIterator for OrderedSet<T, E> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		self.elements
			.into_vec()
			.into_iter()
			.pipe(|inner| IntoIter { inner })
	}
}

/// Iterator over `&T` in position order. See [`OrderedSet::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<'a, T> {
	inner: slice::Iter<'a, T>,
}
forward_iterator!(Iter<'a, T> => &'a T);

/// Owning iterator over `T` in position order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoIter<T> {
	inner: vec::IntoIter<T>,
}
forward_iterator!(IntoIter<T> => T);
