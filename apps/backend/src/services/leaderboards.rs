//! Read-through cached leaderboards.
//!
//! The cache only saves store round trips. A miss, a cache failure or an
//! unreadable cached value all fall back to the store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{country_key, global_key, group_key, LeaderboardCache};
use crate::domain::models::{Entry, Player};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::store::{
    StoreError, TournamentStore, COUNTRY_LEADERBOARD_LIMIT, GLOBAL_LEADERBOARD_LIMIT,
    GROUP_VIEW_LIMIT,
};

pub struct LeaderboardService {
    store: Arc<dyn TournamentStore>,
    cache: Arc<dyn LeaderboardCache>,
    ttl: Duration,
}

impl LeaderboardService {
    pub fn new(
        store: Arc<dyn TournamentStore>,
        cache: Arc<dyn LeaderboardCache>,
        ttl: Duration,
    ) -> Self {
        Self { store, cache, ttl }
    }

    /// Top players by level.
    pub async fn global_leaderboard(&self) -> Result<Vec<Player>, DomainError> {
        let store = self.store.clone();
        self.read_through(&global_key(), async move {
            store.top_players(GLOBAL_LEADERBOARD_LIMIT).await
        })
        .await
    }

    /// Top players of one country by level.
    pub async fn country_leaderboard(&self, country: &str) -> Result<Vec<Player>, DomainError> {
        let code = country.trim().to_ascii_uppercase();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation(
                ValidationKind::InvalidCountry,
                format!("country must be a two-letter code, got '{country}'"),
            ));
        }

        let store = self.store.clone();
        let key = country_key(&code);
        self.read_through(&key, async move {
            store
                .top_players_in_country(&code, COUNTRY_LEADERBOARD_LIMIT)
                .await
        })
        .await
    }

    /// A group's ranked view, highest score first.
    pub async fn group_leaderboard(&self, group_id: &str) -> Result<Vec<Entry>, DomainError> {
        let group_id = group_id.trim();
        if group_id.is_empty() {
            return Err(DomainError::validation_other("groupId is required"));
        }

        let store = self.store.clone();
        let owned = group_id.to_string();
        self.read_through(&group_key(group_id), async move {
            store.top_entries_in_group(&owned, GROUP_VIEW_LIMIT).await
        })
        .await
    }

    async fn read_through<T, F>(&self, key: &str, load: F) -> Result<Vec<T>, DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<Vec<T>, StoreError>>,
    {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(rows) => {
                    debug!(key, rows = rows.len(), "Leaderboard cache hit");
                    return Ok(rows);
                }
                Err(e) => warn!(key, error = %e, "Discarding unreadable cached leaderboard"),
            },
            Ok(None) => debug!(key, "Leaderboard cache miss"),
            Err(e) => warn!(key, error = %e, "Leaderboard cache read failed"),
        }

        let rows = load.await?;

        match serde_json::to_string(&rows) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(key, raw, self.ttl).await {
                    warn!(key, error = %e, "Leaderboard cache write failed");
                }
            }
            Err(e) => warn!(key, error = %e, "Leaderboard could not be serialized for caching"),
        }

        Ok(rows)
    }
}
