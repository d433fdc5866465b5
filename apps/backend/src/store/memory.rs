//! In-process store: three tables behind one lock.
//!
//! `transact` holds the write lock while it evaluates every condition and
//! computes every post-image, and only publishes once all of them succeed,
//! which gives the same all-or-nothing contract as a database transaction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::models::{Entry, Player, Tournament};
use crate::domain::ranking::{player_order, sort_group_view};
use crate::store::txn::{validate_items, CommitReceipt, Record, RecordKey, TxError, TxItem, Write};
use crate::store::{StoreError, TournamentStore};

#[derive(Debug, Default)]
struct Tables {
    players: HashMap<String, Player>,
    tournaments: HashMap<String, Tournament>,
    entries: HashMap<(String, String), Entry>,
}

impl Tables {
    fn get(&self, key: &RecordKey) -> Option<Record> {
        match key {
            RecordKey::Player(id) => self.players.get(id).cloned().map(Record::Player),
            RecordKey::Tournament(id) => self.tournaments.get(id).cloned().map(Record::Tournament),
            RecordKey::Entry {
                tournament_id,
                user_id,
            } => self
                .entries
                .get(&(tournament_id.clone(), user_id.clone()))
                .cloned()
                .map(Record::Entry),
        }
    }

    fn put(&mut self, record: Record) {
        match record {
            Record::Player(p) => {
                self.players.insert(p.id.clone(), p);
            }
            Record::Tournament(t) => {
                self.tournaments.insert(t.id.clone(), t);
            }
            Record::Entry(e) => {
                self.entries
                    .insert((e.tournament_id.clone(), e.user_id.clone()), e);
            }
        }
    }
}

pub struct MemoryStore {
    tables: RwLock<Tables>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// `clock` stamps `updated_at` on mutated players.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            clock,
        }
    }

    /// Number of entries carrying `group_id`, regardless of any view limit.
    pub fn group_size(&self, group_id: &str) -> usize {
        self.tables
            .read()
            .entries
            .values()
            .filter(|e| e.group_id == group_id)
            .count()
    }

    /// Every entry of a tournament, unordered.
    pub fn entries_of(&self, tournament_id: &str) -> Vec<Entry> {
        self.tables
            .read()
            .entries
            .values()
            .filter(|e| e.tournament_id == tournament_id)
            .cloned()
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TournamentStore for MemoryStore {
    async fn get_player(&self, id: &str) -> Result<Option<Player>, StoreError> {
        Ok(self.tables.read().players.get(id).cloned())
    }

    async fn get_tournament(&self, id: &str) -> Result<Option<Tournament>, StoreError> {
        Ok(self.tables.read().tournaments.get(id).cloned())
    }

    async fn get_entry(
        &self,
        tournament_id: &str,
        user_id: &str,
    ) -> Result<Option<Entry>, StoreError> {
        Ok(self
            .tables
            .read()
            .entries
            .get(&(tournament_id.to_string(), user_id.to_string()))
            .cloned())
    }

    async fn transact(&self, items: Vec<TxItem>) -> Result<CommitReceipt, TxError> {
        validate_items(&items)?;
        let now = self.clock.now();

        let mut tables = self.tables.write();
        let mut images = Vec::with_capacity(items.len());
        let mut failed = Vec::new();

        for (i, item) in items.iter().enumerate() {
            let current = tables.get(&item.key);
            if !item.condition.holds(current.as_ref()) {
                failed.push(i);
                continue;
            }
            let image = match &item.write {
                Write::Put(record) => Some(record.clone()),
                Write::Update(mutation) => {
                    // An update of a missing record, or one breaking an invariant, fails
                    match current.as_ref().and_then(|c| mutation.apply(c, now)) {
                        Some(next) => Some(next),
                        None => {
                            failed.push(i);
                            continue;
                        }
                    }
                }
                Write::Check => current,
            };
            images.push(image);
        }

        if !failed.is_empty() {
            debug!(items = items.len(), failed = ?failed, "memory transaction rejected");
            return Err(TxError::ConditionFailed { failed });
        }

        for (item, image) in items.iter().zip(images.iter()) {
            if matches!(item.write, Write::Check) {
                continue;
            }
            if let Some(record) = image {
                tables.put(record.clone());
            }
        }

        debug!(items = items.len(), "memory transaction committed");
        Ok(CommitReceipt { images })
    }

    async fn top_players(&self, limit: u64) -> Result<Vec<Player>, StoreError> {
        let tables = self.tables.read();
        let mut players: Vec<Player> = tables.players.values().cloned().collect();
        players.sort_by(player_order);
        players.truncate(clamp(limit));
        Ok(players)
    }

    async fn top_players_in_country(
        &self,
        country: &str,
        limit: u64,
    ) -> Result<Vec<Player>, StoreError> {
        let tables = self.tables.read();
        let mut players: Vec<Player> = tables
            .players
            .values()
            .filter(|p| p.country.as_deref() == Some(country))
            .cloned()
            .collect();
        players.sort_by(player_order);
        players.truncate(clamp(limit));
        Ok(players)
    }

    async fn top_entries_in_group(
        &self,
        group_id: &str,
        limit: u64,
    ) -> Result<Vec<Entry>, StoreError> {
        let tables = self.tables.read();
        let mut view: Vec<Entry> = tables
            .entries
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        sort_group_view(&mut view);
        view.truncate(clamp(limit));
        Ok(view)
    }
}

fn clamp(limit: u64) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}
