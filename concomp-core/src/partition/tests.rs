//! Unit and property tests for [`Partition`].

use std::num::NonZeroUsize;

use proptest::prelude::*;
use rstest::rstest;

use super::Partition;
use crate::test_utils::suite_proptest_config;

fn partition(total: usize, parts: usize) -> Partition {
    Partition::new(total, NonZeroUsize::new(parts).expect("parts must be non-zero"))
}

#[rstest]
#[case::even(8, 4, vec![0..2, 2..4, 4..6, 6..8])]
#[case::remainder_to_last(10, 3, vec![0..3, 3..6, 6..10])]
#[case::single_part(5, 1, vec![0..5])]
#[case::more_parts_than_items(2, 4, vec![0..0, 0..0, 0..0, 0..2])]
#[case::empty_space(0, 3, vec![0..0, 0..0, 0..0])]
fn ranges_split_space_contiguously(
    #[case] total: usize,
    #[case] parts: usize,
    #[case] expected: Vec<std::ops::Range<usize>>,
) {
    let ranges: Vec<_> = partition(total, parts).ranges().collect();
    assert_eq!(ranges, expected);
}

#[test]
fn range_past_last_part_is_empty() {
    assert_eq!(partition(10, 3).range(7), 10..10);
}

#[rstest]
#[case(10, 3, 2, 0)]
#[case(10, 3, 3, 1)]
#[case(10, 3, 8, 2)]
#[case(10, 3, 9, 2)]
#[case(2, 4, 1, 3)]
fn owner_of_matches_known_boundaries(
    #[case] total: usize,
    #[case] parts: usize,
    #[case] index: usize,
    #[case] expected: usize,
) {
    assert_eq!(partition(total, parts).owner_of(index), expected);
}

proptest! {
    #![proptest_config(suite_proptest_config(256))]

    #[test]
    fn owner_of_agrees_with_range(total in 0usize..200, parts in 1usize..40) {
        let partition = partition(total, parts);
        for index in 0..total {
            let owner = partition.owner_of(index);
            prop_assert!(owner < parts);
            prop_assert!(
                partition.range(owner).contains(&index),
                "index {index} assigned to part {owner} with range {:?}",
                partition.range(owner),
            );
        }
    }

    #[test]
    fn ranges_cover_space_exactly_once(total in 0usize..200, parts in 1usize..40) {
        let mut next = 0;
        for range in partition(total, parts).ranges() {
            prop_assert_eq!(range.start, next);
            prop_assert!(range.end >= range.start);
            next = range.end;
        }
        prop_assert_eq!(next, total);
    }
}
