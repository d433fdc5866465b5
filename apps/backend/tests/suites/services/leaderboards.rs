use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tourney::cache::{
    global_key, group_key, CacheError, LeaderboardCache, MemoryLeaderboardCache,
};
use tourney::errors::domain::{DomainError, ValidationKind};
use tourney::services::LeaderboardService;
use tourney::store::TournamentStore;

use crate::support::fixtures::{
    clock_at, flow, memory_store, player, seed_eligible, seed_player, MORNING, TODAY,
};

const TTL: Duration = Duration::from_secs(60);

/// Cache backend that is always down.
struct BrokenCache;

#[async_trait]
impl LeaderboardCache for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

fn service(
    store: Arc<dyn TournamentStore>,
    cache: Arc<dyn LeaderboardCache>,
) -> LeaderboardService {
    LeaderboardService::new(store, cache, TTL)
}

#[tokio::test]
async fn global_orders_by_level() -> Result<(), DomainError> {
    let store = memory_store(clock_at(MORNING));
    let low = seed_player(store.as_ref(), player(3, 0, Some("DE"))).await;
    let high = seed_player(store.as_ref(), player(40, 0, Some("TR"))).await;
    let mid = seed_player(store.as_ref(), player(12, 0, None)).await;

    let boards = service(store, Arc::new(MemoryLeaderboardCache::new()));
    let ids: Vec<_> = boards
        .global_leaderboard()
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![high.id, mid.id, low.id]);
    Ok(())
}

#[tokio::test]
async fn country_filters_and_normalizes_code() -> Result<(), DomainError> {
    let store = memory_store(clock_at(MORNING));
    let tr = seed_player(store.as_ref(), player(5, 0, Some("TR"))).await;
    seed_player(store.as_ref(), player(50, 0, Some("DE"))).await;

    let boards = service(store, Arc::new(MemoryLeaderboardCache::new()));
    let rows = boards.country_leaderboard("tr").await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, tr.id);

    let err = boards.country_leaderboard("TUR").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidCountry, _)
    ));
    Ok(())
}

#[tokio::test]
async fn cached_result_is_served_until_expiry() -> Result<(), DomainError> {
    let store = memory_store(clock_at(MORNING));
    seed_player(store.as_ref(), player(5, 0, None)).await;
    let boards = service(store.clone(), Arc::new(MemoryLeaderboardCache::new()));

    assert_eq!(boards.global_leaderboard().await?.len(), 1);
    seed_player(store.as_ref(), player(6, 0, None)).await;

    // stale but within TTL
    assert_eq!(boards.global_leaderboard().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn unreadable_cache_value_falls_back_to_store() -> Result<(), DomainError> {
    let store = memory_store(clock_at(MORNING));
    seed_player(store.as_ref(), player(5, 0, None)).await;
    let cache = Arc::new(MemoryLeaderboardCache::new());
    cache
        .set(&global_key(), "{not json".to_string(), TTL)
        .await
        .expect("cache set");

    let boards = service(store, cache.clone());
    assert_eq!(boards.global_leaderboard().await?.len(), 1);

    let refreshed = cache.get(&global_key()).await.expect("cache get");
    assert!(refreshed.is_some_and(|raw| raw.starts_with('[')));
    Ok(())
}

#[tokio::test]
async fn broken_cache_does_not_fail_reads() -> Result<(), DomainError> {
    let store = memory_store(clock_at(MORNING));
    seed_player(store.as_ref(), player(5, 0, Some("TR"))).await;
    let boards = service(store, Arc::new(BrokenCache));

    assert_eq!(boards.global_leaderboard().await?.len(), 1);
    assert_eq!(boards.country_leaderboard("TR").await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn group_view_is_ranked_and_cached_per_group() -> Result<(), DomainError> {
    let clock = clock_at(MORNING);
    let store = memory_store(clock.clone());
    let flow = flow(store.clone(), clock);
    flow.start_tournament().await?;
    let players = seed_eligible(store.as_ref(), 3).await;
    for (i, p) in players.iter().enumerate() {
        flow.enter_tournament(&p.id, TODAY).await?;
        flow.update_score(TODAY, &p.id, (i as i64 + 1) * 7).await?;
    }

    let cache = Arc::new(MemoryLeaderboardCache::new());
    let boards = service(store, cache.clone());
    let group = "2024-01-15-group-1";
    let rows = boards.group_leaderboard(group).await?;

    let ids: Vec<_> = rows.iter().map(|e| e.user_id.clone()).collect();
    assert_eq!(
        ids,
        vec![
            players[2].id.clone(),
            players[1].id.clone(),
            players[0].id.clone()
        ]
    );
    assert!(cache.get(&group_key(group)).await.expect("get").is_some());

    let err = boards.group_leaderboard("  ").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::Other(_), _)));
    Ok(())
}
