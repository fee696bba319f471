//! Panics from user code must leave containers either untouched or fully updated, never torn.
#![cfg(not(target_arch = "wasm32"))]

use ordered_index::{equality::FnEquality, Equality, OrderedMap, OrderedSet};
use std::{
	cell::Cell,
	panic::{catch_unwind, AssertUnwindSafe},
	rc::Rc,
};

/// Integer equality with a constant hash, so every lookup compares against every stored element.
///
/// Once armed with `n`, the `n`-th comparison after that panics.
fn tripwire_equality(countdown: Rc<Cell<Option<usize>>>) -> impl Equality<i32> {
	FnEquality::new(
		move |a: &i32, b: &i32| {
			if let Some(remaining) = countdown.get() {
				assert!(remaining > 1, "equality tripped");
				countdown.set(Some(remaining - 1));
			}
			a == b
		},
		|_: &i32| 0_u64,
	)
}

fn tripwire_set(elements: &[i32]) -> (OrderedSet<i32, impl Equality<i32>>, Rc<Cell<Option<usize>>>) {
	let countdown = Rc::new(Cell::new(None));
	let set = OrderedSet::from_seed_with_equality(elements.iter().copied(), tripwire_equality(countdown.clone()));
	(set, countdown)
}

#[test]
fn panicking_equality_during_insert_leaves_set_unchanged_or_complete() {
	for nth in 1..8 {
		let (mut set, countdown) = tripwire_set(&[1, 2]);
		countdown.set(Some(nth));
		let result = catch_unwind(AssertUnwindSafe(|| set.insert(0, 9)));
		countdown.set(None);

		match result {
			Err(_) => assert_eq!(set.as_slice(), [1, 2], "torn after panic on comparison {nth}"),
			Ok(inserted) => {
				assert_eq!(inserted, Ok(()));
				assert_eq!(set.as_slice(), [9, 1, 2]);
			}
		}
		assert_eq!(set.check_invariants(), Ok(()));
	}
}

#[test]
fn panicking_equality_during_set_by_position_leaves_set_unchanged_or_complete() {
	for nth in 1..8 {
		let (mut set, countdown) = tripwire_set(&[1, 2, 3]);
		countdown.set(Some(nth));
		let result = catch_unwind(AssertUnwindSafe(|| set.set_by_position(1, 9)));
		countdown.set(None);

		match result {
			Err(_) => assert_eq!(set.as_slice(), [1, 2, 3], "torn after panic on comparison {nth}"),
			Ok(replaced) => {
				assert_eq!(replaced, Ok(2));
				assert_eq!(set.as_slice(), [1, 9, 3]);
			}
		}
		assert_eq!(set.check_invariants(), Ok(()));
	}
}

#[test]
fn panicking_equality_during_map_insert_keeps_keys_and_values_aligned() {
	for nth in 1..8 {
		let countdown = Rc::new(Cell::new(None));
		let mut map = OrderedMap::from_seed_with_equality([(1, 'a'), (2, 'b')], tripwire_equality(countdown.clone()));
		countdown.set(Some(nth));
		let result = catch_unwind(AssertUnwindSafe(|| map.insert(1, 9, 'x')));
		countdown.set(None);

		if result.is_err() {
			assert_eq!(map.keys(), [1, 2]);
			assert_eq!(map.values(), ['a', 'b']);
		} else {
			assert_eq!(map.keys(), [1, 9, 2]);
			assert_eq!(map.get_by_key(&9), Ok(&'x'));
		}
		assert_eq!(map.check_invariants(), Ok(()));
	}
}

#[test]
fn panicking_map_retain_commits_what_it_saw() {
	let mut map: OrderedMap<i32, i32> = (0..6).map(|k| (k, k * 10)).collect();
	let result = catch_unwind(AssertUnwindSafe(|| {
		map.retain(|&k, _| {
			assert!(k != 3, "predicate gave up");
			k % 2 == 0
		})
	}));

	assert!(result.is_err());
	assert_eq!(map.keys(), [0, 2, 3, 4, 5]);
	assert_eq!(map.values(), [0, 20, 30, 40, 50]);
	assert_eq!(map.try_get_position_by_key(&4), Some(3));
	assert_eq!(map.check_invariants(), Ok(()));
}

#[test]
fn panicking_set_retain_commits_what_it_saw() {
	let mut set: OrderedSet<i32> = (0..6).collect();
	let result = catch_unwind(AssertUnwindSafe(|| {
		set.retain(|&e| {
			assert!(e != 3, "predicate gave up");
			e % 2 == 0
		})
	}));

	assert!(result.is_err());
	assert_eq!(set.as_slice(), [0, 2, 3, 4, 5]);
	assert_eq!(set.position_of(&5), Some(4));
	assert_eq!(set.check_invariants(), Ok(()));
}
