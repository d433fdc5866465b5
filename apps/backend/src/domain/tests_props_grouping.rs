//! Property tests for group assignment (pure domain, no store).
//!
//! Properties tested:
//! - Every group holds between 1 and 35 members
//! - N sequential placements produce exactly ceil(N/35) groups
//! - The cursor always agrees with the member count of its current group

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::domain::grouping::{GroupCursor, Placement, GROUP_CAPACITY};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_capacity_and_group_count(n in 1usize..400) {
        let mut cursor = GroupCursor::initial();
        let mut members: BTreeMap<String, i32> = BTreeMap::new();

        for _ in 0..n {
            let placement = Placement::next("t", cursor);
            *members.entry(placement.group_id.clone()).or_default() += 1;
            cursor = placement.cursor;
            prop_assert!(cursor.is_valid());
        }

        let expected_groups = n.div_ceil(GROUP_CAPACITY as usize);
        prop_assert_eq!(members.len(), expected_groups);
        prop_assert!(members.values().all(|&m| (1..=GROUP_CAPACITY).contains(&m)));

        let current = format!("t-group-{}", cursor.index);
        prop_assert_eq!(members.get(&current).copied(), Some(cursor.count));
    }

    #[test]
    fn prop_advance_never_skips_a_group(index in 1i32..10_000, count in 0i32..=GROUP_CAPACITY) {
        let next = GroupCursor { index, count }.advance();
        prop_assert!(next.index == index || next.index == index + 1);
        prop_assert!(next.count >= 1);
    }
}
