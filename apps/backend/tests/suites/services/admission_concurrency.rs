//! Concurrent admissions against one tournament.
//!
//! Callers race on the group cursor; losers get a retryable conflict and
//! try again, like the HTTP handler does.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tourney::domain::grouping::GROUP_CAPACITY;
use tourney::errors::domain::{ConflictKind, DomainError};
use tourney::services::{Admission, TournamentFlowService};
use tourney::store::{MemoryStore, TournamentStore};

use crate::support::fixtures::{clock_at, flow, seed_eligible, MORNING, TODAY};

async fn enter_with_retries(
    flow: &TournamentFlowService,
    user_id: &str,
) -> Result<Admission, DomainError> {
    loop {
        match flow.enter_tournament(user_id, TODAY).await {
            Err(e) if e.is_retryable() => tokio::task::yield_now().await,
            other => return other,
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn groups_never_exceed_capacity() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let memory = Arc::new(MemoryStore::with_clock(clock.clone()));
    let store: Arc<dyn TournamentStore> = memory.clone();
    let flow = Arc::new(flow(store.clone(), clock));
    flow.start_tournament().await?;

    let players = seed_eligible(store.as_ref(), 80).await;

    let handles = players.iter().map(|p| {
        let flow = flow.clone();
        let user_id = p.id.clone();
        tokio::spawn(async move { enter_with_retries(&flow, &user_id).await })
    });
    let results = join_all(handles).await;

    let mut per_group: HashMap<String, usize> = HashMap::new();
    for joined in results {
        let admission = joined.expect("task panicked")?;
        *per_group.entry(admission.entry.group_id).or_default() += 1;
    }

    assert_eq!(per_group.values().sum::<usize>(), 80);
    assert_eq!(per_group.len(), 3);
    for (group_id, n) in &per_group {
        assert!(*n <= GROUP_CAPACITY as usize, "{group_id} holds {n}");
        assert_eq!(memory.group_size(group_id), *n);
    }
    assert_eq!(memory.group_size("2024-01-15-group-1"), 35);
    assert_eq!(memory.group_size("2024-01-15-group-2"), 35);
    assert_eq!(memory.group_size("2024-01-15-group-3"), 10);

    let t = store.get_tournament(TODAY).await?.expect("tournament");
    assert_eq!((t.cursor.index, t.cursor.count), (3, 10));

    for p in &players {
        let stored = store.get_player(&p.id).await?.expect("player");
        assert_eq!(stored.coins, 500, "charged exactly once");
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_user_racing_enters_once() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let memory = Arc::new(MemoryStore::with_clock(clock.clone()));
    let store: Arc<dyn TournamentStore> = memory.clone();
    let flow = Arc::new(flow(store.clone(), clock));
    flow.start_tournament().await?;
    let p = seed_eligible(store.as_ref(), 1).await.remove(0);

    let handles = (0..8).map(|_| {
        let flow = flow.clone();
        let user_id = p.id.clone();
        tokio::spawn(async move { enter_with_retries(&flow, &user_id).await })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    let admitted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(admitted, 1);
    for r in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(
            r,
            DomainError::Conflict(ConflictKind::AlreadyInTournament, _)
        ));
    }

    assert_eq!(memory.entries_of(TODAY).len(), 1);
    assert_eq!(store.get_player(&p.id).await?.expect("player").coins, 500);
    Ok(())
}
