//! Property tests for group placement through the admission service.
//!
//! Properties tested:
//! - Sequential admissions fill groups to capacity in order
//! - The final cursor matches the number of admissions
//! - Every entrant pays the entry cost exactly once

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;
use tourney::domain::grouping::GROUP_CAPACITY;
use tourney::store::{MemoryStore, TournamentStore};

use crate::common::proptest_prelude::proptest_prelude_config;
use crate::support::fixtures::{clock_at, flow, seed_eligible, MORNING, TODAY};

fn run<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(fut)
}

proptest! {
    #![proptest_config(proptest_prelude_config())]

    #[test]
    fn prop_groups_fill_in_order(n in 1usize..120) {
        let (per_group, cursor, balances) = run(async move {
            let clock = clock_at(MORNING);
            let store: Arc<dyn TournamentStore> =
                Arc::new(MemoryStore::with_clock(clock.clone()));
            let flow = flow(store.clone(), clock);
            flow.start_tournament().await.expect("start");

            let players = seed_eligible(store.as_ref(), n).await;
            let mut per_group: HashMap<String, usize> = HashMap::new();
            for p in &players {
                let a = flow.enter_tournament(&p.id, TODAY).await.expect("enter");
                *per_group.entry(a.entry.group_id).or_default() += 1;
            }

            let t = store.get_tournament(TODAY).await.expect("read").expect("tournament");
            let mut balances = Vec::with_capacity(n);
            for p in &players {
                balances.push(store.get_player(&p.id).await.expect("read").expect("player").coins);
            }
            (per_group, t.cursor, balances)
        });

        let cap = GROUP_CAPACITY as usize;
        let groups = n.div_ceil(cap);
        prop_assert_eq!(per_group.len(), groups);
        for index in 1..=groups {
            let expected = if index < groups { cap } else { n - cap * (groups - 1) };
            let key = format!("{TODAY}-group-{index}");
            prop_assert_eq!(per_group.get(&key).copied(), Some(expected));
        }

        prop_assert_eq!(cursor.index as usize, groups);
        prop_assert_eq!(cursor.count as usize, n - cap * (groups - 1));
        prop_assert!(balances.iter().all(|c| *c == 500));
    }
}
