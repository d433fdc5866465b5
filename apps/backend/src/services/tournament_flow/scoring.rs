use tracing::{debug, info};

use super::admission::not_active;
use super::{store_failure, TournamentFlowService};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::store::{Condition, EntryMutation, Mutation, RecordKey, TxItem};

const ENTRY_ITEM: usize = 0;
const TOURNAMENT_ITEM: usize = 1;

impl TournamentFlowService {
    /// Add `increment` to an entrant's score and return the new score.
    ///
    /// The increment commits together with a check that the tournament is
    /// still active, so once `end_tournament` has committed scores are frozen.
    pub async fn update_score(
        &self,
        tournament_id: &str,
        user_id: &str,
        increment: i64,
    ) -> Result<i64, DomainError> {
        if increment <= 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidScoreIncrement,
                format!("Score increment must be positive, got {increment}"),
            ));
        }

        if self.store.get_entry(tournament_id, user_id).await?.is_none() {
            return Err(entry_not_found(tournament_id, user_id));
        }

        let items = vec![
            TxItem::update(
                RecordKey::entry(tournament_id, user_id),
                Mutation::Entry(EntryMutation::AddScore(increment)),
                Condition::Exists,
            ),
            TxItem::check(
                RecordKey::tournament(tournament_id),
                Condition::TournamentActive(true),
            ),
        ];

        match self.store.transact(items).await {
            Ok(receipt) => {
                let score = receipt
                    .entry(ENTRY_ITEM)
                    .map(|e| e.score)
                    .ok_or_else(|| entry_not_found(tournament_id, user_id))?;
                info!(tournament_id, user_id, increment, score, "Score updated");
                Ok(score)
            }
            Err(e) if e.failed_at(ENTRY_ITEM) => Err(entry_not_found(tournament_id, user_id)),
            Err(e) if e.failed_at(TOURNAMENT_ITEM) => {
                debug!(tournament_id, user_id, "Score rejected, tournament closed");
                Err(not_active(tournament_id))
            }
            Err(e) => Err(store_failure(e)),
        }
    }
}

pub(super) fn entry_not_found(tournament_id: &str, user_id: &str) -> DomainError {
    DomainError::not_found(
        NotFoundKind::TournamentEntry,
        format!("No entry for user {user_id} in tournament {tournament_id}"),
    )
}
