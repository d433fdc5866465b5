//! Rank resolution within a group's ranked view.

use std::cmp::Ordering;

use crate::domain::models::{Entry, Player};

/// Total order of a group's ranked view: higher score first, then the
/// earlier entrant, then the smaller user id.
pub fn ranked_order(a: &Entry, b: &Entry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.entered_at.cmp(&b.entered_at))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

pub fn sort_group_view(view: &mut [Entry]) {
    view.sort_by(ranked_order);
}

/// Player leaderboard order: higher level first, then the older account,
/// then the smaller id.
pub fn player_order(a: &Player, b: &Player) -> Ordering {
    b.level
        .cmp(&a.level)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// 1-based position of `user_id` in an already ordered view.
pub fn rank_of(view: &[Entry], user_id: &str) -> Option<u32> {
    view.iter()
        .position(|e| e.user_id == user_id)
        .and_then(|i| u32::try_from(i + 1).ok())
}
