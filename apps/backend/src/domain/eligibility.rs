//! Entry eligibility: a pure predicate over a player and the entry rules.

use crate::domain::models::Player;
use crate::errors::domain::{DomainError, ValidationKind};

pub const DEFAULT_ENTRY_COST: i64 = 500;
pub const DEFAULT_MIN_LEVEL: i32 = 10;

/// What a player must have to enter a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRequirements {
    pub cost: i64,
    pub min_level: i32,
}

impl Default for EntryRequirements {
    fn default() -> Self {
        Self {
            cost: DEFAULT_ENTRY_COST,
            min_level: DEFAULT_MIN_LEVEL,
        }
    }
}

/// Level is checked before balance.
pub fn check_eligibility(
    player: &Player,
    requirements: &EntryRequirements,
) -> Result<(), DomainError> {
    if player.level < requirements.min_level {
        return Err(DomainError::validation(
            ValidationKind::UserLevelTooLow,
            format!(
                "Level {} is below the required level {}",
                player.level, requirements.min_level
            ),
        ));
    }
    if player.coins < requirements.cost {
        return Err(DomainError::validation(
            ValidationKind::InsufficientCoins,
            format!(
                "Balance {} is below the entry cost {}",
                player.coins, requirements.cost
            ),
        ));
    }
    Ok(())
}
