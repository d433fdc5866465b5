//! Storage capability consumed by the tournament services.
//!
//! Services only ever talk to `Arc<dyn TournamentStore>`. Correctness under
//! concurrent callers rests on [`TournamentStore::transact`]: every
//! precondition is evaluated at commit time and the writes are applied all
//! together or not at all.

pub mod memory;
pub mod txn;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::grouping::GROUP_CAPACITY;
use crate::domain::models::{Entry, Player, Tournament};
use crate::errors::domain::{DomainError, InfraErrorKind};

pub use memory::MemoryStore;
pub use txn::{
    CommitReceipt, Condition, EntryMutation, Mutation, PlayerMutation, Record, RecordKey,
    TournamentMutation, TxError, TxItem, Write,
};

pub const GLOBAL_LEADERBOARD_LIMIT: u64 = 1000;
pub const COUNTRY_LEADERBOARD_LIMIT: u64 = 1000;
pub const GROUP_VIEW_LIMIT: u64 = GROUP_CAPACITY as u64;

/// Store failures that are not a failed precondition. Never retried inside the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store timeout: {0}")]
    Timeout(String),
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error("store error: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(d) => DomainError::infra(InfraErrorKind::StoreUnavailable, d),
            StoreError::Timeout(d) => DomainError::infra(InfraErrorKind::Timeout, d),
            StoreError::Corrupt(d) => DomainError::infra(InfraErrorKind::DataCorruption, d),
            StoreError::InvalidTransaction(d) => {
                DomainError::infra(InfraErrorKind::Other("InvalidTransaction".into()), d)
            }
            StoreError::Backend(d) => DomainError::infra(InfraErrorKind::Other("Store".into()), d),
        }
    }
}

#[async_trait]
pub trait TournamentStore: Send + Sync {
    async fn get_player(&self, id: &str) -> Result<Option<Player>, StoreError>;

    async fn get_tournament(&self, id: &str) -> Result<Option<Tournament>, StoreError>;

    async fn get_entry(
        &self,
        tournament_id: &str,
        user_id: &str,
    ) -> Result<Option<Entry>, StoreError>;

    /// Atomic, all-or-nothing conditional commit of `items`.
    async fn transact(&self, items: Vec<TxItem>) -> Result<CommitReceipt, TxError>;

    /// Players by level, highest first.
    async fn top_players(&self, limit: u64) -> Result<Vec<Player>, StoreError>;

    /// Players of one country by level, highest first.
    async fn top_players_in_country(
        &self,
        country: &str,
        limit: u64,
    ) -> Result<Vec<Player>, StoreError>;

    /// A group's ranked view, in `domain::ranking` order.
    async fn top_entries_in_group(
        &self,
        group_id: &str,
        limit: u64,
    ) -> Result<Vec<Entry>, StoreError>;
}
