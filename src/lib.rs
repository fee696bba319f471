//! Insertion-ordered hash maps and sets with positional access.
//!
//! [`OrderedMap`] and [`OrderedSet`] look up keys (elements) in O(1) on average,
//! **and** index their entries by dense zero-based position, like a [`Vec`](`alloc::vec::Vec`).
//!
//! # Performance Focus
//!
//! Each container is a plain sequence plus a hash table that maps keys to their current positions.
//! Appending, popping from the end, key lookups and positional reads are cheap.
//!
//! Inserting or removing anywhere else is O(n), since every later entry moves and is re-indexed.
//! There is no tree here, so there's no O(log n) positional mutation either.
//!
//! # Equality
//!
//! Each container fixes an [`Equality`] strategy at construction and uses it for every comparison and hash.
//! [`DefaultEquality`] defers to [`Eq`] and [`Hash`](`core::hash::Hash`).
//!
//! # Logging
//!
//! Re-indexing passes emit [`tracing`] events at `TRACE` level, bulk operations at `DEBUG`.
//! No subscriber is installed by this crate.
#![no_std]
#![doc(html_root_url = "https://docs.rs/ordered-index/0.0.1")]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::semicolon_if_nothing_returned)]

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
mod readme {}

extern crate alloc;

#[macro_use]
mod macros;

pub mod equality;
mod error;
mod keyed_sequence;
mod lookup_index;
pub mod ordered_map;
pub mod ordered_set;
mod sequence_store;

pub use equality::{DefaultEquality, Equality};
pub use error::Error;
pub use ordered_map::OrderedMap;
pub use ordered_set::OrderedSet;
