use thiserror::Error;

/// Errors returned by [`OrderedMap`](`crate::OrderedMap`) and [`OrderedSet`](`crate::OrderedSet`).
///
/// All of these are caller precondition violations. None of them are transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
	/// A key was added or inserted while an equal key was already present.
	#[error("an entry with the same key already exists")]
	DuplicateKey,
	/// An element was inserted or assigned while an equal element was already present.
	#[error("an equal element already exists")]
	DuplicateElement,
	/// A key-indexed read found no entry.
	#[error("the given key was not present")]
	KeyNotFound,
	/// A position was outside the valid range.
	///
	/// That's `0..len` for access and `0..=len` for insertion.
	#[error("position {index} is out of range for length {len}")]
	IndexOutOfRange {
		/// The offending position.
		index: usize,
		/// The container's length at the time.
		len: usize,
	},
	/// The lookup index and the backing sequence disagree about `position`.
	///
	/// Only reported by `check_invariants`. Seeing this is a bug in this crate
	/// (or in an [`Equality`](`crate::Equality`) implementation that isn't consistent).
	#[error("lookup index disagrees with the backing sequence at position {position}")]
	InvalidState {
		/// The first position found to be inconsistent.
		position: usize,
	},
}
