//! Pluggable equality and hashing for keys and elements.

use core::hash::{BuildHasher, Hash};

/// An equality strategy: decides which keys (or elements) are considered the same, and hashes them consistently.
///
/// A strategy is fixed at container construction and used for **every** comparison and hash that container makes.
///
/// # Logic Errors
///
/// Implementations must uphold `equals(a, b) ⇒ hash_of(a) == hash_of(b)`,
/// and must not change their answers while values are stored in a container.
/// A strategy that also implements `Equality<Q>` for some `Q` that `T` [`Borrow`](`core::borrow::Borrow`)s
/// must give the same answers for a `&Q` as for the `&T` it was borrowed from.
/// Violating this won't cause undefined behaviour, but lookups may then miss entries or report them at stale positions.
pub trait Equality<T: ?Sized> {
	/// Whether `a` and `b` denote the same key.
	fn equals(&self, a: &T, b: &T) -> bool;

	/// Hashes `value`.
	fn hash_of(&self, value: &T) -> u64;
}

impl<T: ?Sized, E: ?Sized + Equality<T>> Equality<T> for &E {
	fn equals(&self, a: &T, b: &T) -> bool {
		(**self).equals(a, b)
	}

	fn hash_of(&self, value: &T) -> u64 {
		(**self).hash_of(value)
	}
}

/// The natural equality of `T`, through its [`Eq`] and [`Hash`] implementations.
///
/// `S` builds the hashers. It defaults to [`hashbrown::DefaultHashBuilder`].
#[derive(Debug, Clone, Default)]
pub struct DefaultEquality<S = hashbrown::DefaultHashBuilder> {
	hash_builder: S,
}

impl<S> DefaultEquality<S> {
	/// Creates a new [`DefaultEquality`] hashing through `hash_builder`.
	pub const fn with_hasher(hash_builder: S) -> Self {
		Self { hash_builder }
	}

	/// Retrieves the hash builder.
	pub const fn hasher(&self) -> &S {
		&self.hash_builder
	}
}

impl<T: ?Sized + Eq + Hash, S: BuildHasher> Equality<T> for DefaultEquality<S> {
	fn equals(&self, a: &T, b: &T) -> bool {
		a == b
	}

	fn hash_of(&self, value: &T) -> u64 {
		self.hash_builder.hash_one(value)
	}
}

/// An [`Equality`] assembled from two closures.
///
/// ```
/// use ordered_index::{equality::FnEquality, Equality};
///
/// let case_insensitive = FnEquality::new(
/// 	|a: &str, b: &str| a.eq_ignore_ascii_case(b),
/// 	|s: &str| s.bytes().fold(0_u64, |h, b| h.wrapping_mul(31).wrapping_add(b.to_ascii_lowercase().into())),
/// );
/// assert!(case_insensitive.equals("Key", "kEY"));
/// assert_eq!(case_insensitive.hash_of("Key"), case_insensitive.hash_of("KEY"));
/// ```
#[derive(Clone, Copy)]
pub struct FnEquality<F, H> {
	equals: F,
	hash_of: H,
}

impl<F, H> FnEquality<F, H> {
	/// Creates a new [`FnEquality`] from an equality predicate and a compatible hash function.
	pub const fn new(equals: F, hash_of: H) -> Self {
		Self { equals, hash_of }
	}
}

impl<T: ?Sized, F, H> Equality<T> for FnEquality<F, H>
where
	F: Fn(&T, &T) -> bool,
	H: Fn(&T) -> u64,
{
	fn equals(&self, a: &T, b: &T) -> bool {
		(self.equals)(a, b)
	}

	fn hash_of(&self, value: &T) -> u64 {
		(self.hash_of)(value)
	}
}

impl<F, H> core::fmt::Debug for FnEquality<F, H> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("FnEquality").finish_non_exhaustive()
	}
}
