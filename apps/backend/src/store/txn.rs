//! Multi-item conditional commits.
//!
//! A commit is a list of [`TxItem`]s. Each item targets one record, carries
//! one write and one precondition. Either every precondition holds at commit
//! time and every write is applied, or nothing is applied and the failing
//! positions are reported.

use std::collections::HashSet;

use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::grouping::GroupCursor;
use crate::domain::models::{Entry, Player, Tournament};
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Player(String),
    Tournament(String),
    Entry {
        tournament_id: String,
        user_id: String,
    },
}

impl RecordKey {
    pub fn player(id: impl Into<String>) -> Self {
        Self::Player(id.into())
    }

    pub fn tournament(id: impl Into<String>) -> Self {
        Self::Tournament(id.into())
    }

    pub fn entry(tournament_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::Entry {
            tournament_id: tournament_id.into(),
            user_id: user_id.into(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            RecordKey::Player(_) => "player",
            RecordKey::Tournament(_) => "tournament",
            RecordKey::Entry { .. } => "entry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Player(Player),
    Tournament(Tournament),
    Entry(Entry),
}

impl Record {
    pub fn key(&self) -> RecordKey {
        match self {
            Record::Player(p) => RecordKey::player(p.id.clone()),
            Record::Tournament(t) => RecordKey::tournament(t.id.clone()),
            Record::Entry(e) => RecordKey::entry(e.tournament_id.clone(), e.user_id.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMutation {
    /// Add `delta` (may be negative) to the balance.
    AdjustCoins(i64),
    SetProgress { level: i32, coins_delta: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentMutation {
    AdvanceCursor(GroupCursor),
    SetActive(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMutation {
    AddScore(i64),
    MarkClaimed(OffsetDateTime),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Player(PlayerMutation),
    Tournament(TournamentMutation),
    Entry(EntryMutation),
}

impl Mutation {
    /// Post-image of `record` after this mutation.
    ///
    /// `None` when the result would break a record invariant (negative
    /// balance or score); stores report that as a failed condition.
    pub fn apply(&self, record: &Record, at: OffsetDateTime) -> Option<Record> {
        match (self, record) {
            (Mutation::Player(m), Record::Player(p)) => {
                let mut next = p.clone();
                match *m {
                    PlayerMutation::AdjustCoins(delta) => {
                        next.coins = p.coins.checked_add(delta)?;
                    }
                    PlayerMutation::SetProgress { level, coins_delta } => {
                        next.level = level;
                        next.coins = p.coins.checked_add(coins_delta)?;
                    }
                }
                next.updated_at = at;
                (next.coins >= 0 && next.level >= 1).then_some(Record::Player(next))
            }
            (Mutation::Tournament(m), Record::Tournament(t)) => {
                let mut next = t.clone();
                match *m {
                    TournamentMutation::AdvanceCursor(cursor) => next.cursor = cursor,
                    TournamentMutation::SetActive(active) => next.active = active,
                }
                next.cursor.is_valid().then_some(Record::Tournament(next))
            }
            (Mutation::Entry(m), Record::Entry(e)) => {
                let mut next = e.clone();
                match *m {
                    EntryMutation::AddScore(delta) => {
                        next.score = e.score.checked_add(delta)?;
                    }
                    EntryMutation::MarkClaimed(at) => {
                        next.claimed_reward = true;
                        next.claimed_at = Some(at);
                    }
                }
                (next.score >= 0).then_some(Record::Entry(next))
            }
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Mutation::Player(_) => "player",
            Mutation::Tournament(_) => "tournament",
            Mutation::Entry(_) => "entry",
        }
    }
}

/// Precondition evaluated against the record's state at commit time.
///
/// Everything except `None` and `NotExists` implies the record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    None,
    Exists,
    NotExists,
    PlayerEligible { min_level: i32, min_coins: i64 },
    PlayerLevelIs(i32),
    TournamentActive(bool),
    /// Active and still holding exactly this cursor.
    TournamentOpenAt(GroupCursor),
    EntryUnclaimed,
}

impl Condition {
    pub fn holds(&self, current: Option<&Record>) -> bool {
        match (self, current) {
            (Condition::None, _) => true,
            (Condition::NotExists, current) => current.is_none(),
            (_, None) => false,
            (Condition::Exists, Some(_)) => true,
            (Condition::PlayerEligible { min_level, min_coins }, Some(Record::Player(p))) => {
                p.level >= *min_level && p.coins >= *min_coins
            }
            (Condition::PlayerLevelIs(level), Some(Record::Player(p))) => p.level == *level,
            (Condition::TournamentActive(active), Some(Record::Tournament(t))) => {
                t.active == *active
            }
            (Condition::TournamentOpenAt(cursor), Some(Record::Tournament(t))) => {
                t.active && t.cursor == *cursor
            }
            (Condition::EntryUnclaimed, Some(Record::Entry(e))) => !e.claimed_reward,
            _ => false,
        }
    }

    /// Record kind this condition can be evaluated against, if restricted.
    fn kind(&self) -> Option<&'static str> {
        match self {
            Condition::PlayerEligible { .. } | Condition::PlayerLevelIs(_) => Some("player"),
            Condition::TournamentActive(_) | Condition::TournamentOpenAt(_) => Some("tournament"),
            Condition::EntryUnclaimed => Some("entry"),
            Condition::None | Condition::Exists | Condition::NotExists => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Insert or replace the whole record.
    Put(Record),
    Update(Mutation),
    /// No write; the item only contributes its condition.
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxItem {
    pub key: RecordKey,
    pub write: Write,
    pub condition: Condition,
}

impl TxItem {
    pub fn put(record: Record, condition: Condition) -> Self {
        Self {
            key: record.key(),
            write: Write::Put(record),
            condition,
        }
    }

    pub fn update(key: RecordKey, mutation: Mutation, condition: Condition) -> Self {
        Self {
            key,
            write: Write::Update(mutation),
            condition,
        }
    }

    pub fn check(key: RecordKey, condition: Condition) -> Self {
        Self {
            key,
            write: Write::Check,
            condition,
        }
    }
}

/// Post-images of a successful commit, in item order.
///
/// `Check` items report the record as it was; a `Check` with
/// `Condition::None` on a missing record reports `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    pub images: Vec<Option<Record>>,
}

impl CommitReceipt {
    pub fn player(&self, item: usize) -> Option<&Player> {
        match self.images.get(item) {
            Some(Some(Record::Player(p))) => Some(p),
            _ => None,
        }
    }

    pub fn tournament(&self, item: usize) -> Option<&Tournament> {
        match self.images.get(item) {
            Some(Some(Record::Tournament(t))) => Some(t),
            _ => None,
        }
    }

    pub fn entry(&self, item: usize) -> Option<&Entry> {
        match self.images.get(item) {
            Some(Some(Record::Entry(e))) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// Nothing was written. Positions refer to the submitted items; a
    /// backend may stop evaluating at the first failure.
    #[error("transaction conditions failed at items {failed:?}")]
    ConditionFailed { failed: Vec<usize> },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TxError {
    pub fn failed_at(&self, item: usize) -> bool {
        matches!(self, TxError::ConditionFailed { failed } if failed.contains(&item))
    }
}

/// Reject commits no backend could apply atomically: empty, duplicate
/// targets, or writes and conditions aimed at the wrong record kind.
pub fn validate_items(items: &[TxItem]) -> Result<(), StoreError> {
    if items.is_empty() {
        return Err(StoreError::InvalidTransaction(
            "transaction has no items".into(),
        ));
    }

    let mut seen = HashSet::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if !seen.insert(&item.key) {
            return Err(StoreError::InvalidTransaction(format!(
                "item {i} targets {:?} more than once",
                item.key
            )));
        }

        let kind = item.key.kind();
        let write_ok = match &item.write {
            Write::Put(record) => record.key() == item.key,
            Write::Update(mutation) => mutation.kind() == kind,
            Write::Check => true,
        };
        let condition_ok = item.condition.kind().map_or(true, |k| k == kind);
        if !write_ok || !condition_ok {
            return Err(StoreError::InvalidTransaction(format!(
                "item {i} does not match its {kind} key"
            )));
        }
    }
    Ok(())
}
