use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::cache::LeaderboardCache;
use crate::config::rules::TournamentRules;
use crate::domain::clock::Clock;
use crate::services::leaderboards::LeaderboardService;
use crate::services::players::PlayerService;
use crate::services::tournament_flow::TournamentFlowService;
use crate::store::TournamentStore;

/// Shared collaborators, assembled once by `infra::state::StateBuilder`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TournamentStore>,
    pub cache: Arc<dyn LeaderboardCache>,
    pub clock: Arc<dyn Clock>,
    pub rules: TournamentRules,
    pub cache_ttl: Duration,
    /// Extra attempts the entry route makes after a lost group-counter race.
    pub entry_race_retries: u32,
    /// Database connection behind `store`, when it is sea-orm backed
    pub db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn tournament_flow(&self) -> TournamentFlowService {
        TournamentFlowService::new(self.store.clone(), self.rules, self.clock.clone())
    }

    pub fn players(&self) -> PlayerService {
        PlayerService::new(self.store.clone(), self.clock.clone())
    }

    pub fn leaderboards(&self) -> LeaderboardService {
        LeaderboardService::new(self.store.clone(), self.cache.clone(), self.cache_ttl)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("rules", &self.rules)
            .field("cache_ttl", &self.cache_ttl)
            .field("entry_race_retries", &self.entry_race_retries)
            .field("db", &self.db.is_some())
            .finish_non_exhaustive()
    }
}
