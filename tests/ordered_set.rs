#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test as test;

use ordered_index::{equality::FnEquality, Error, OrderedSet};

fn set<const N: usize>(elements: [i32; N]) -> OrderedSet<i32> {
	OrderedSet::from_seed(elements)
}

#[test]
fn symmetric_except() {
	let mut a = set([1, 2, 3]);
	a.symmetric_except_with([2, 3, 4]);
	assert_eq!(a.as_slice(), [1, 4]);
	assert_eq!(a.position_of(&4), Some(1));
}

#[test]
fn self_algebra_laws() {
	let original = set([5, 3, 8, 1]);

	let mut a = original.clone();
	a.union_with(original.to_vec());
	assert_eq!(a, original);

	let mut a = original.clone();
	a.intersect_with(original.iter());
	assert_eq!(a, original);

	let mut a = original.clone();
	a.except_with(original.iter());
	assert!(a.is_empty());
	assert_eq!(a.check_invariants(), Ok(()));

	assert!(original.is_subset_of(original.iter()));
	assert!(original.is_superset_of(original.iter()));
	assert!(original.set_equals(original.iter()));
	assert!(!original.is_proper_subset_of(original.iter()));
	assert!(!original.is_proper_superset_of(original.iter()));
}

#[test]
fn order_and_reindexing_after_remove_at() {
	let mut s = set([10, 20, 30]);
	assert_eq!(s.remove_at(1), Ok(20));
	assert_eq!(s.as_slice(), [10, 30]);
	assert_eq!(s.position_of(&30), Some(1));
	assert_eq!(s.remove_at(2), Err(Error::IndexOutOfRange { index: 2, len: 2 }));
}

#[test]
fn insert_reports_both_failures() {
	let mut s = set([1, 2]);
	assert_eq!(s.insert(0, 2), Err(Error::DuplicateElement));
	assert_eq!(s.insert(3, 7), Err(Error::IndexOutOfRange { index: 3, len: 2 }));
	s.insert(2, 7).unwrap();
	assert_eq!(s.as_slice(), [1, 2, 7]);
}

#[test]
fn seed_deduplicates_earliest_first() {
	let s = set([3, 1, 3, 2, 1]);
	assert_eq!(s.as_slice(), [3, 1, 2]);
}

#[test]
fn equality_strategy_is_used_for_algebra_operands() {
	let by_magnitude = FnEquality::new(|a: &i32, b: &i32| a.abs() == b.abs(), |v: &i32| u64::from(v.unsigned_abs()));
	let mut s = OrderedSet::with_equality(by_magnitude);
	assert!(s.add(1));
	assert!(s.add(-2));
	assert!(!s.add(-1));

	assert!(s.set_equals([2, -1]));
	s.except_with([-2]);
	assert_eq!(s.as_slice(), [1]);
	s.symmetric_except_with([-1, 3]);
	assert_eq!(s.as_slice(), [3]);
}

#[test]
fn debug_lists_in_order() {
	let s = set([2, 1]);
	assert_eq!(format!("{s:?}"), "{2, 1}");
}
