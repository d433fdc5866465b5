use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::adapters::store_sea::SeaStore;
use crate::cache::{
    LeaderboardCache, MemoryLeaderboardCache, RedisLeaderboardCache, DEFAULT_CACHE_TTL,
};
use crate::config::app::{Config, StoreBackend, DEFAULT_ENTRY_RACE_RETRIES};
use crate::config::db::DbProfile;
use crate::config::rules::TournamentRules;
use crate::domain::clock::{Clock, SystemClock};
use crate::error::AppError;
use crate::infra::db::{bootstrap_db, connect_sqlite_memory};
use crate::state::app_state::AppState;
use crate::store::{MemoryStore, TournamentStore};

enum StoreChoice {
    Memory,
    Postgres(DbProfile),
    SqliteMemory,
    Custom(Arc<dyn TournamentStore>),
}

enum CacheChoice {
    Memory,
    Redis(String),
    Custom(Arc<dyn LeaderboardCache>),
}

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    store: StoreChoice,
    cache: CacheChoice,
    clock: Option<Arc<dyn Clock>>,
    rules: TournamentRules,
    cache_ttl: Duration,
    entry_race_retries: u32,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            store: StoreChoice::Memory,
            cache: CacheChoice::Memory,
            clock: None,
            rules: TournamentRules::default(),
            cache_ttl: DEFAULT_CACHE_TTL,
            entry_race_retries: DEFAULT_ENTRY_RACE_RETRIES,
        }
    }

    /// Everything the binary reads from the environment.
    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new()
            .with_rules(config.rules)
            .with_cache_ttl(config.cache_ttl)
            .with_entry_race_retries(config.entry_race_retries);
        if config.store_backend == StoreBackend::Postgres {
            builder = builder.with_postgres(DbProfile::Prod);
        }
        if let Some(url) = &config.redis_url {
            builder = builder.with_redis(url.clone());
        }
        builder
    }

    pub fn with_postgres(mut self, profile: DbProfile) -> Self {
        self.store = StoreChoice::Postgres(profile);
        self
    }

    /// sea-orm store on a private in-memory SQLite database.
    pub fn with_sqlite_memory(mut self) -> Self {
        self.store = StoreChoice::SqliteMemory;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn TournamentStore>) -> Self {
        self.store = StoreChoice::Custom(store);
        self
    }

    pub fn with_redis(mut self, url: impl Into<String>) -> Self {
        self.cache = CacheChoice::Redis(url.into());
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn LeaderboardCache>) -> Self {
        self.cache = CacheChoice::Custom(cache);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_rules(mut self, rules: TournamentRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_entry_race_retries(mut self, retries: u32) -> Self {
        self.entry_race_retries = retries;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let (store, db): (Arc<dyn TournamentStore>, Option<DatabaseConnection>) = match self.store
        {
            StoreChoice::Memory => (Arc::new(MemoryStore::with_clock(clock.clone())), None),
            StoreChoice::Postgres(profile) => {
                // single entrypoint: migrate + connect
                let conn = bootstrap_db(profile).await?;
                (
                    Arc::new(SeaStore::new(conn.clone(), clock.clone())),
                    Some(conn),
                )
            }
            StoreChoice::SqliteMemory => {
                let conn = connect_sqlite_memory().await?;
                (
                    Arc::new(SeaStore::new(conn.clone(), clock.clone())),
                    Some(conn),
                )
            }
            StoreChoice::Custom(store) => (store, None),
        };

        let cache: Arc<dyn LeaderboardCache> = match self.cache {
            CacheChoice::Memory => Arc::new(MemoryLeaderboardCache::new()),
            CacheChoice::Redis(url) => Arc::new(RedisLeaderboardCache::connect(&url).await?),
            CacheChoice::Custom(cache) => cache,
        };

        info!(
            sea_store = db.is_some(),
            cache_ttl_secs = self.cache_ttl.as_secs(),
            entry_cost = self.rules.requirements.cost,
            min_level = self.rules.requirements.min_level,
            "application state built"
        );

        Ok(AppState {
            store,
            cache,
            clock,
            rules: self.rules,
            cache_ttl: self.cache_ttl,
            entry_race_retries: self.entry_race_retries,
            db,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
