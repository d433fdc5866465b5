//! Read cache in front of the three ranked queries.
//!
//! The cache is never a source of truth: entry, score and claim writes do not
//! touch it, and any miss or failure is resolved against the store.

pub mod memory;
pub mod redis_cache;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryLeaderboardCache;
pub use redis_cache::RedisLeaderboardCache;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
    #[error("cache error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait LeaderboardCache: Send + Sync {
    /// Cached serialized ranked list, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

pub fn global_key() -> String {
    "leaderboard:global".to_string()
}

pub fn country_key(country: &str) -> String {
    format!("leaderboard:country:{country}")
}

pub fn group_key(group_id: &str) -> String {
    format!("leaderboard:tournament:{group_id}")
}
