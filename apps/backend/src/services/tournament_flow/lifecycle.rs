use tracing::{debug, info};

use super::{store_failure, TournamentFlowService};
use crate::domain::grouping::GroupCursor;
use crate::domain::models::Tournament;
use crate::domain::schedule::tournament_bounds;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::store::{Condition, Mutation, Record, RecordKey, TournamentMutation, TxItem};

impl TournamentFlowService {
    /// Create today's tournament, active, with an empty first group.
    ///
    /// Fails with `AlreadyInTournament` if a row for today exists, whether it
    /// is still active or already ended.
    pub async fn start_tournament(&self) -> Result<Tournament, DomainError> {
        let now = self.clock.now();
        let (id, starts_at, ends_at) = tournament_bounds(now);

        let tournament = Tournament {
            id: id.clone(),
            starts_at,
            ends_at,
            active: true,
            cursor: GroupCursor::initial(),
        };

        let items = vec![TxItem::put(
            Record::Tournament(tournament.clone()),
            Condition::NotExists,
        )];

        match self.store.transact(items).await {
            Ok(_) => {
                info!(tournament_id = %id, ends_at = %ends_at, "Tournament started");
                Ok(tournament)
            }
            Err(e) if e.failed_at(0) => {
                debug!(tournament_id = %id, "Tournament already exists for today");
                Err(DomainError::conflict(
                    ConflictKind::AlreadyInTournament,
                    format!("Tournament {id} already exists"),
                ))
            }
            Err(e) => Err(store_failure(e)),
        }
    }

    /// Flip `active` to false. Terminal; a second call fails.
    pub async fn end_tournament(&self, tournament_id: &str) -> Result<Tournament, DomainError> {
        let current = self
            .store
            .get_tournament(tournament_id)
            .await?
            .ok_or_else(|| tournament_not_found(tournament_id))?;

        if !current.active {
            return Err(already_inactive(tournament_id));
        }

        let items = vec![TxItem::update(
            RecordKey::tournament(tournament_id),
            Mutation::Tournament(TournamentMutation::SetActive(false)),
            Condition::TournamentActive(true),
        )];

        match self.store.transact(items).await {
            Ok(receipt) => {
                let ended = receipt.tournament(0).cloned().unwrap_or(Tournament {
                    active: false,
                    ..current
                });
                info!(
                    tournament_id,
                    groups = ended.cursor.index,
                    last_group_size = ended.cursor.count,
                    "Tournament ended"
                );
                Ok(ended)
            }
            // Someone else ended it (or removed it) between the read and the commit
            Err(e) if e.failed_at(0) => match self.store.get_tournament(tournament_id).await? {
                None => Err(tournament_not_found(tournament_id)),
                Some(_) => Err(already_inactive(tournament_id)),
            },
            Err(e) => Err(store_failure(e)),
        }
    }
}

pub(super) fn tournament_not_found(tournament_id: &str) -> DomainError {
    DomainError::not_found(
        NotFoundKind::Tournament,
        format!("Tournament {tournament_id} not found"),
    )
}

fn already_inactive(tournament_id: &str) -> DomainError {
    DomainError::conflict(
        ConflictKind::TournamentAlreadyInactive,
        format!("Tournament {tournament_id} is already inactive"),
    )
}
