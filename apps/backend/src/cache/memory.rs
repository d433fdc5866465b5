use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;

use super::{CacheError, LeaderboardCache};

/// Each value carries its own TTL.
struct PerEntryTtl;

impl Expiry<String, (String, Duration)> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &(String, Duration),
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.1)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &(String, Duration),
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

/// In-process cache for development and tests.
#[derive(Clone)]
pub struct MemoryLeaderboardCache {
    inner: Cache<String, (String, Duration)>,
}

impl MemoryLeaderboardCache {
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(10_000)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

impl Default for MemoryLeaderboardCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeaderboardCache for MemoryLeaderboardCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.inner.get(key).await.map(|(value, _)| value))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.inner.insert(key.to_string(), (value, ttl)).await;
        Ok(())
    }
}
