use tracing::{debug, warn};

use super::scoring::entry_not_found;
use super::TournamentFlowService;
use crate::domain::models::Entry;
use crate::domain::ranking::rank_of;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::store::GROUP_VIEW_LIMIT;

impl TournamentFlowService {
    /// 1-based rank of the entrant within their group.
    pub async fn resolve_rank(
        &self,
        tournament_id: &str,
        user_id: &str,
    ) -> Result<u32, DomainError> {
        let entry = self
            .store
            .get_entry(tournament_id, user_id)
            .await?
            .ok_or_else(|| entry_not_found(tournament_id, user_id))?;

        self.rank_in_group(&entry).await?.ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::LeaderboardPosition,
                format!(
                    "User {user_id} not found in leaderboard of {}",
                    entry.group_id
                ),
            )
        })
    }

    /// Position of `entry` in its group's ranked view, `None` if the view misses it.
    pub(super) async fn rank_in_group(&self, entry: &Entry) -> Result<Option<u32>, DomainError> {
        let view = self
            .store
            .top_entries_in_group(&entry.group_id, GROUP_VIEW_LIMIT)
            .await?;

        let rank = rank_of(&view, &entry.user_id);
        match rank {
            Some(rank) => debug!(
                tournament_id = %entry.tournament_id,
                user_id = %entry.user_id,
                group_id = %entry.group_id,
                rank,
                "Rank resolved"
            ),
            None => warn!(
                tournament_id = %entry.tournament_id,
                user_id = %entry.user_id,
                group_id = %entry.group_id,
                view_len = view.len(),
                "Entry missing from its group view"
            ),
        }
        Ok(rank)
    }
}
