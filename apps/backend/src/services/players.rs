//! Player accounts and level progress.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::clock::Clock;
use crate::domain::models::Player;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::store::{
    Condition, Mutation, PlayerMutation, Record, RecordKey, TournamentStore, TxError, TxItem,
};

pub const STARTING_LEVEL: i32 = 1;
pub const STARTING_COINS: i64 = 1000;
pub const COINS_PER_LEVEL: i64 = 100;
pub const MAX_USERNAME_LEN: usize = 32;

pub struct PlayerService {
    store: Arc<dyn TournamentStore>,
    clock: Arc<dyn Clock>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn TournamentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// New player at level 1 with the starting balance.
    ///
    /// `country` is optional; when present it must be a two-letter code and
    /// is stored upper-cased.
    pub async fn create_player(
        &self,
        username: &str,
        country: Option<&str>,
    ) -> Result<Player, DomainError> {
        let username = normalize_username(username)?;
        let country = country.map(normalize_country).transpose()?.flatten();

        let now = self.clock.now();
        let player = Player {
            id: Uuid::new_v4().to_string(),
            username,
            level: STARTING_LEVEL,
            coins: STARTING_COINS,
            country,
            created_at: now,
            updated_at: now,
        };

        let items = vec![TxItem::put(
            Record::Player(player.clone()),
            Condition::NotExists,
        )];
        match self.store.transact(items).await {
            Ok(_) => {
                info!(user_id = %player.id, country = ?player.country, "Player created");
                Ok(player)
            }
            Err(TxError::Store(e)) => Err(e.into()),
            Err(TxError::ConditionFailed { .. }) => Err(DomainError::conflict(
                ConflictKind::Other("PlayerExists".into()),
                format!("Player {} already exists", player.id),
            )),
        }
    }

    pub async fn get_player(&self, user_id: &str) -> Result<Player, DomainError> {
        self.store
            .get_player(user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))
    }

    /// Raise the player's level and credit `COINS_PER_LEVEL` per level gained.
    ///
    /// Committed against the level read here; a concurrent progress update
    /// makes this one fail with `OptimisticLock`.
    pub async fn update_progress(
        &self,
        user_id: &str,
        new_level: i32,
    ) -> Result<Player, DomainError> {
        let current = self.get_player(user_id).await?;

        if new_level <= current.level {
            return Err(DomainError::validation(
                ValidationKind::InvalidLevelIncrease,
                format!(
                    "newLevel must be greater than current level ({} <= {})",
                    new_level, current.level
                ),
            ));
        }

        let gained = i64::from(new_level - current.level);
        let coins_delta = gained * COINS_PER_LEVEL;

        let items = vec![TxItem::update(
            RecordKey::player(user_id),
            Mutation::Player(PlayerMutation::SetProgress {
                level: new_level,
                coins_delta,
            }),
            Condition::PlayerLevelIs(current.level),
        )];

        match self.store.transact(items).await {
            Ok(receipt) => {
                let updated = receipt
                    .player(0)
                    .cloned()
                    .ok_or_else(|| user_not_found(user_id))?;
                info!(
                    user_id,
                    from_level = current.level,
                    to_level = updated.level,
                    coins = updated.coins,
                    "Progress updated"
                );
                Ok(updated)
            }
            Err(TxError::Store(e)) => Err(e.into()),
            Err(TxError::ConditionFailed { .. }) => match self.store.get_player(user_id).await? {
                None => Err(user_not_found(user_id)),
                Some(p) => {
                    debug!(
                        user_id,
                        observed_level = current.level,
                        current_level = p.level,
                        "Lost progress race"
                    );
                    Err(DomainError::conflict(
                        ConflictKind::OptimisticLock,
                        format!("Level of player {user_id} changed concurrently"),
                    ))
                }
            },
        }
    }
}

fn user_not_found(user_id: &str) -> DomainError {
    DomainError::not_found(NotFoundKind::User, format!("User {user_id} not found"))
}

fn normalize_username(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            "username is required",
        ));
    }
    if name.chars().count() > MAX_USERNAME_LEN {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            format!("username must be at most {MAX_USERNAME_LEN} characters"),
        ));
    }
    Ok(name.to_string())
}

/// Blank means "no country".
fn normalize_country(raw: &str) -> Result<Option<String>, DomainError> {
    let code = raw.trim();
    if code.is_empty() {
        return Ok(None);
    }
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::validation(
            ValidationKind::InvalidCountry,
            format!("country must be a two-letter code, got '{code}'"),
        ));
    }
    Ok(Some(code.to_ascii_uppercase()))
}
