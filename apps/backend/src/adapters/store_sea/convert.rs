//! Row <-> domain conversions.

use sea_orm::Set;
use time::OffsetDateTime;

use crate::domain::grouping::GroupCursor;
use crate::domain::models::{Entry, Player, Tournament};
use crate::entities::{players, tournament_entries, tournaments};
use crate::store::StoreError;

pub fn player_from_row(row: players::Model) -> Player {
    Player {
        id: row.id,
        username: row.username,
        level: row.level,
        coins: row.coins,
        country: row.country,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn tournament_from_row(row: tournaments::Model) -> Result<Tournament, StoreError> {
    let cursor = GroupCursor {
        index: row.group_index,
        count: row.group_count,
    };
    if !cursor.is_valid() {
        return Err(StoreError::Corrupt(format!(
            "tournament {} holds an invalid group cursor ({}, {})",
            row.id, cursor.index, cursor.count
        )));
    }
    Ok(Tournament {
        id: row.id,
        starts_at: row.starts_at,
        ends_at: row.ends_at,
        active: row.active,
        cursor,
    })
}

pub fn entry_from_row(row: tournament_entries::Model) -> Entry {
    Entry {
        tournament_id: row.tournament_id,
        user_id: row.user_id,
        score: row.score,
        group_id: row.group_id,
        claimed_reward: row.claimed_reward,
        claimed_at: row.claimed_at,
        entered_at: row.entered_at,
    }
}

pub fn player_active(p: &Player) -> players::ActiveModel {
    players::ActiveModel {
        id: Set(p.id.clone()),
        username: Set(p.username.clone()),
        level: Set(p.level),
        coins: Set(p.coins),
        country: Set(p.country.clone()),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

pub fn tournament_active(t: &Tournament, updated_at: OffsetDateTime) -> tournaments::ActiveModel {
    tournaments::ActiveModel {
        id: Set(t.id.clone()),
        starts_at: Set(t.starts_at),
        ends_at: Set(t.ends_at),
        active: Set(t.active),
        group_index: Set(t.cursor.index),
        group_count: Set(t.cursor.count),
        updated_at: Set(updated_at),
    }
}

pub fn entry_active(e: &Entry) -> tournament_entries::ActiveModel {
    tournament_entries::ActiveModel {
        tournament_id: Set(e.tournament_id.clone()),
        user_id: Set(e.user_id.clone()),
        score: Set(e.score),
        group_id: Set(e.group_id.clone()),
        claimed_reward: Set(e.claimed_reward),
        claimed_at: Set(e.claimed_at),
        entered_at: Set(e.entered_at),
    }
}
