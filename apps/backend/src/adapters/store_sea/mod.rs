//! SeaORM implementation of `TournamentStore`.
//!
//! `transact` runs inside one database transaction. Every item becomes a
//! single conditional statement whose affected-row count tells whether its
//! precondition held; the first zero rolls everything back.

mod convert;

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, UpdateResult,
};
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::models::{Entry, Player, Tournament};
use crate::entities::{players, tournament_entries, tournaments};
use crate::infra::db_errors::map_db_err;
use crate::store::txn::{
    validate_items, CommitReceipt, Condition, EntryMutation, Mutation, PlayerMutation, Record,
    RecordKey, TournamentMutation, TxError, TxItem, Write,
};
use crate::store::{StoreError, TournamentStore};
use convert::{
    entry_active, entry_from_row, player_active, player_from_row, tournament_active,
    tournament_from_row,
};

pub struct SeaStore {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl SeaStore {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn affected(res: Result<UpdateResult, DbErr>) -> Result<bool, StoreError> {
    res.map(|r| r.rows_affected > 0).map_err(map_db_err)
}

fn player_condition(cond: Condition) -> Option<SimpleExpr> {
    match cond {
        Condition::PlayerEligible {
            min_level,
            min_coins,
        } => Some(
            players::Column::Level
                .gte(min_level)
                .and(players::Column::Coins.gte(min_coins)),
        ),
        Condition::PlayerLevelIs(level) => Some(players::Column::Level.eq(level)),
        _ => None,
    }
}

fn tournament_condition(cond: Condition) -> Option<SimpleExpr> {
    match cond {
        Condition::TournamentActive(active) => Some(tournaments::Column::Active.eq(active)),
        Condition::TournamentOpenAt(cursor) => Some(
            tournaments::Column::Active
                .eq(true)
                .and(tournaments::Column::GroupIndex.eq(cursor.index))
                .and(tournaments::Column::GroupCount.eq(cursor.count)),
        ),
        _ => None,
    }
}

fn entry_condition(cond: Condition) -> Option<SimpleExpr> {
    match cond {
        Condition::EntryUnclaimed => Some(tournament_entries::Column::ClaimedReward.eq(false)),
        _ => None,
    }
}

fn entry_key(tournament_id: &str, user_id: &str) -> SimpleExpr {
    tournament_entries::Column::TournamentId
        .eq(tournament_id)
        .and(tournament_entries::Column::UserId.eq(user_id))
}

async fn read_record(
    txn: &DatabaseTransaction,
    key: &RecordKey,
) -> Result<Option<Record>, StoreError> {
    let record = match key {
        RecordKey::Player(id) => players::Entity::find_by_id(id.clone())
            .one(txn)
            .await
            .map_err(map_db_err)?
            .map(|row| Record::Player(player_from_row(row))),
        RecordKey::Tournament(id) => match tournaments::Entity::find_by_id(id.clone())
            .one(txn)
            .await
            .map_err(map_db_err)?
        {
            Some(row) => Some(Record::Tournament(tournament_from_row(row)?)),
            None => None,
        },
        RecordKey::Entry {
            tournament_id,
            user_id,
        } => tournament_entries::Entity::find_by_id((tournament_id.clone(), user_id.clone()))
            .one(txn)
            .await
            .map_err(map_db_err)?
            .map(|row| Record::Entry(entry_from_row(row))),
    };
    Ok(record)
}

/// Self-assigning UPDATE: matches (and locks) the row only if the condition holds.
async fn check(
    txn: &DatabaseTransaction,
    key: &RecordKey,
    cond: Condition,
) -> Result<bool, StoreError> {
    match key {
        RecordKey::Player(id) => {
            let mut q = players::Entity::update_many()
                .col_expr(players::Column::Id, Expr::col(players::Column::Id).into())
                .filter(players::Column::Id.eq(id.as_str()));
            if let Some(c) = player_condition(cond) {
                q = q.filter(c);
            }
            affected(q.exec(txn).await)
        }
        RecordKey::Tournament(id) => {
            let mut q = tournaments::Entity::update_many()
                .col_expr(
                    tournaments::Column::Id,
                    Expr::col(tournaments::Column::Id).into(),
                )
                .filter(tournaments::Column::Id.eq(id.as_str()));
            if let Some(c) = tournament_condition(cond) {
                q = q.filter(c);
            }
            affected(q.exec(txn).await)
        }
        RecordKey::Entry {
            tournament_id,
            user_id,
        } => {
            let mut q = tournament_entries::Entity::update_many()
                .col_expr(
                    tournament_entries::Column::Score,
                    Expr::col(tournament_entries::Column::Score).into(),
                )
                .filter(entry_key(tournament_id, user_id));
            if let Some(c) = entry_condition(cond) {
                q = q.filter(c);
            }
            affected(q.exec(txn).await)
        }
    }
}

/// INSERT that affects nothing when the key is taken.
async fn insert_new(
    txn: &DatabaseTransaction,
    record: &Record,
    now: OffsetDateTime,
) -> Result<bool, StoreError> {
    let inserted = match record {
        Record::Player(p) => players::Entity::insert(player_active(p))
            .on_conflict(
                OnConflict::column(players::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await,
        Record::Tournament(t) => tournaments::Entity::insert(tournament_active(t, now))
            .on_conflict(
                OnConflict::column(tournaments::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await,
        Record::Entry(e) => tournament_entries::Entity::insert(entry_active(e))
            .on_conflict(
                OnConflict::columns([
                    tournament_entries::Column::TournamentId,
                    tournament_entries::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(txn)
            .await,
    };
    inserted.map(|rows| rows > 0).map_err(map_db_err)
}

/// Unconditional insert-or-replace.
async fn upsert(
    txn: &DatabaseTransaction,
    record: &Record,
    now: OffsetDateTime,
) -> Result<bool, StoreError> {
    let written = match record {
        Record::Player(p) => players::Entity::insert(player_active(p))
            .on_conflict(
                OnConflict::column(players::Column::Id)
                    .update_columns([
                        players::Column::Username,
                        players::Column::Level,
                        players::Column::Coins,
                        players::Column::Country,
                        players::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await,
        Record::Tournament(t) => tournaments::Entity::insert(tournament_active(t, now))
            .on_conflict(
                OnConflict::column(tournaments::Column::Id)
                    .update_columns([
                        tournaments::Column::StartsAt,
                        tournaments::Column::EndsAt,
                        tournaments::Column::Active,
                        tournaments::Column::GroupIndex,
                        tournaments::Column::GroupCount,
                        tournaments::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await,
        Record::Entry(e) => tournament_entries::Entity::insert(entry_active(e))
            .on_conflict(
                OnConflict::columns([
                    tournament_entries::Column::TournamentId,
                    tournament_entries::Column::UserId,
                ])
                .update_columns([
                    tournament_entries::Column::Score,
                    tournament_entries::Column::GroupId,
                    tournament_entries::Column::ClaimedReward,
                    tournament_entries::Column::ClaimedAt,
                    tournament_entries::Column::EnteredAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(txn)
            .await,
    };
    written.map(|rows| rows > 0).map_err(map_db_err)
}

/// Whole-record replacement of an existing row that satisfies `cond`.
async fn replace(
    txn: &DatabaseTransaction,
    record: &Record,
    cond: Condition,
    now: OffsetDateTime,
) -> Result<bool, StoreError> {
    match record {
        Record::Player(p) => {
            let mut q = players::Entity::update_many()
                .set(player_active(p))
                .filter(players::Column::Id.eq(p.id.as_str()));
            if let Some(c) = player_condition(cond) {
                q = q.filter(c);
            }
            affected(q.exec(txn).await)
        }
        Record::Tournament(t) => {
            let mut q = tournaments::Entity::update_many()
                .set(tournament_active(t, now))
                .filter(tournaments::Column::Id.eq(t.id.as_str()));
            if let Some(c) = tournament_condition(cond) {
                q = q.filter(c);
            }
            affected(q.exec(txn).await)
        }
        Record::Entry(e) => {
            let mut q = tournament_entries::Entity::update_many()
                .set(entry_active(e))
                .filter(entry_key(&e.tournament_id, &e.user_id));
            if let Some(c) = entry_condition(cond) {
                q = q.filter(c);
            }
            affected(q.exec(txn).await)
        }
    }
}

/// Conditional in-place mutation. Negative deltas carry a guard so the
/// balance or score can never drop below zero.
async fn update(
    txn: &DatabaseTransaction,
    key: &RecordKey,
    mutation: Mutation,
    cond: Condition,
    now: OffsetDateTime,
) -> Result<bool, StoreError> {
    match (key, mutation) {
        (RecordKey::Player(id), Mutation::Player(m)) => {
            let mut q = players::Entity::update_many()
                .filter(players::Column::Id.eq(id.as_str()))
                .col_expr(players::Column::UpdatedAt, Expr::val(now).into());
            let coins_delta = match m {
                PlayerMutation::AdjustCoins(delta) => delta,
                PlayerMutation::SetProgress { level, coins_delta } => {
                    if level < 1 {
                        return Ok(false);
                    }
                    q = q.col_expr(players::Column::Level, Expr::val(level).into());
                    coins_delta
                }
            };
            q = q.col_expr(
                players::Column::Coins,
                Expr::col(players::Column::Coins).add(coins_delta),
            );
            if coins_delta < 0 {
                let Some(needed) = coins_delta.checked_neg() else {
                    return Ok(false);
                };
                q = q.filter(players::Column::Coins.gte(needed));
            }
            if let Some(c) = player_condition(cond) {
                q = q.filter(c);
            }
            affected(q.exec(txn).await)
        }
        (RecordKey::Tournament(id), Mutation::Tournament(m)) => {
            let mut q = tournaments::Entity::update_many()
                .filter(tournaments::Column::Id.eq(id.as_str()))
                .col_expr(tournaments::Column::UpdatedAt, Expr::val(now).into());
            q = match m {
                TournamentMutation::AdvanceCursor(cursor) => {
                    if !cursor.is_valid() {
                        return Ok(false);
                    }
                    q.col_expr(tournaments::Column::GroupIndex, Expr::val(cursor.index).into())
                        .col_expr(tournaments::Column::GroupCount, Expr::val(cursor.count).into())
                }
                TournamentMutation::SetActive(active) => {
                    q.col_expr(tournaments::Column::Active, Expr::val(active).into())
                }
            };
            if let Some(c) = tournament_condition(cond) {
                q = q.filter(c);
            }
            affected(q.exec(txn).await)
        }
        (
            RecordKey::Entry {
                tournament_id,
                user_id,
            },
            Mutation::Entry(m),
        ) => {
            let mut q =
                tournament_entries::Entity::update_many().filter(entry_key(tournament_id, user_id));
            q = match m {
                EntryMutation::AddScore(delta) => {
                    if delta < 0 {
                        let Some(needed) = delta.checked_neg() else {
                            return Ok(false);
                        };
                        q = q.filter(tournament_entries::Column::Score.gte(needed));
                    }
                    q.col_expr(
                        tournament_entries::Column::Score,
                        Expr::col(tournament_entries::Column::Score).add(delta),
                    )
                }
                EntryMutation::MarkClaimed(at) => q
                    .col_expr(tournament_entries::Column::ClaimedReward, Expr::val(true).into())
                    .col_expr(tournament_entries::Column::ClaimedAt, Expr::val(Some(at)).into()),
            };
            if let Some(c) = entry_condition(cond) {
                q = q.filter(c);
            }
            affected(q.exec(txn).await)
        }
        _ => Err(StoreError::InvalidTransaction(format!(
            "mutation does not match {key:?}"
        ))),
    }
}

async fn apply_item(
    txn: &DatabaseTransaction,
    item: &TxItem,
    now: OffsetDateTime,
) -> Result<bool, StoreError> {
    match (&item.write, item.condition) {
        (Write::Check, Condition::None) => Ok(true),
        (Write::Check, Condition::NotExists) => Ok(read_record(txn, &item.key).await?.is_none()),
        (Write::Check, cond) => check(txn, &item.key, cond).await,
        (Write::Put(record), Condition::NotExists) => insert_new(txn, record, now).await,
        (Write::Put(record), Condition::None) => upsert(txn, record, now).await,
        (Write::Put(record), cond) => replace(txn, record, cond, now).await,
        // An update needs an existing row
        (Write::Update(_), Condition::NotExists) => Ok(false),
        (Write::Update(mutation), cond) => update(txn, &item.key, *mutation, cond, now).await,
    }
}

#[async_trait]
impl TournamentStore for SeaStore {
    async fn get_player(&self, id: &str) -> Result<Option<Player>, StoreError> {
        let row = players::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(row.map(player_from_row))
    }

    async fn get_tournament(&self, id: &str) -> Result<Option<Tournament>, StoreError> {
        let row = tournaments::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        row.map(tournament_from_row).transpose()
    }

    async fn get_entry(
        &self,
        tournament_id: &str,
        user_id: &str,
    ) -> Result<Option<Entry>, StoreError> {
        let row =
            tournament_entries::Entity::find_by_id((tournament_id.to_string(), user_id.to_string()))
                .one(&self.db)
                .await
                .map_err(map_db_err)?;
        Ok(row.map(entry_from_row))
    }

    async fn transact(&self, items: Vec<TxItem>) -> Result<CommitReceipt, TxError> {
        validate_items(&items)?;
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        for (i, item) in items.iter().enumerate() {
            if !apply_item(&txn, item, now).await? {
                txn.rollback().await.map_err(map_db_err)?;
                debug!(items = items.len(), failed = i, "sea transaction rejected");
                return Err(TxError::ConditionFailed { failed: vec![i] });
            }
        }

        let mut images = Vec::with_capacity(items.len());
        for item in &items {
            images.push(read_record(&txn, &item.key).await?);
        }

        txn.commit().await.map_err(map_db_err)?;
        debug!(items = items.len(), "sea transaction committed");
        Ok(CommitReceipt { images })
    }

    async fn top_players(&self, limit: u64) -> Result<Vec<Player>, StoreError> {
        let rows = players::Entity::find()
            .order_by_desc(players::Column::Level)
            .order_by_asc(players::Column::CreatedAt)
            .order_by_asc(players::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(player_from_row).collect())
    }

    async fn top_players_in_country(
        &self,
        country: &str,
        limit: u64,
    ) -> Result<Vec<Player>, StoreError> {
        let rows = players::Entity::find()
            .filter(players::Column::Country.eq(country))
            .order_by_desc(players::Column::Level)
            .order_by_asc(players::Column::CreatedAt)
            .order_by_asc(players::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(player_from_row).collect())
    }

    async fn top_entries_in_group(
        &self,
        group_id: &str,
        limit: u64,
    ) -> Result<Vec<Entry>, StoreError> {
        let rows = tournament_entries::Entity::find()
            .filter(tournament_entries::Column::GroupId.eq(group_id))
            .order_by_desc(tournament_entries::Column::Score)
            .order_by_asc(tournament_entries::Column::EnteredAt)
            .order_by_asc(tournament_entries::Column::UserId)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(entry_from_row).collect())
    }
}
