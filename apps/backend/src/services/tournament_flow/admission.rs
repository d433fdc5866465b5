use tracing::{debug, info};

use super::{store_failure, TournamentFlowService};
use crate::domain::eligibility::check_eligibility;
use crate::domain::grouping::{GroupCursor, Placement};
use crate::domain::models::Entry;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::store::{
    Condition, Mutation, PlayerMutation, Record, RecordKey, TournamentMutation, TxError, TxItem,
};

// A duplicate entry outranks the balance it already spent, including on
// stores that stop at the first failing item.
const ENTRY_ITEM: usize = 0;
const PLAYER_ITEM: usize = 1;
const TOURNAMENT_ITEM: usize = 2;

/// A successful admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub entry: Entry,
    /// Player balance after the entry cost was debited.
    pub remaining_coins: i64,
    /// Tournament cursor written by this admission.
    pub cursor: GroupCursor,
}

impl TournamentFlowService {
    /// Admit `user_id` to `tournament_id` and place them in a group.
    ///
    /// One commit inserts the entry, debits the player and advances the group
    /// cursor from the value read here. A missing tournament reads as not
    /// active. Losing the cursor race yields
    /// `ConflictKind::OptimisticLock` with nothing written.
    pub async fn enter_tournament(
        &self,
        user_id: &str,
        tournament_id: &str,
    ) -> Result<Admission, DomainError> {
        let now = self.clock.now();
        if !self.rules.window.is_open(now) {
            let cutoff = self.rules.window.cutoff;
            return Err(DomainError::validation(
                ValidationKind::EntryWindowClosed,
                format!(
                    "Entries close at {:02}:{:02} UTC",
                    cutoff.hour(),
                    cutoff.minute()
                ),
            ));
        }

        let tournament = match self.store.get_tournament(tournament_id).await? {
            Some(t) if t.active => t,
            _ => return Err(not_active(tournament_id)),
        };

        let player = self
            .store
            .get_player(user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;
        check_eligibility(&player, &self.rules.requirements)?;

        if self.store.get_entry(tournament_id, user_id).await?.is_some() {
            return Err(already_entered(user_id, tournament_id));
        }

        let observed = tournament.cursor;
        let placement = Placement::next(tournament_id, observed);
        let requirements = self.rules.requirements;

        let entry = Entry {
            tournament_id: tournament_id.to_string(),
            user_id: user_id.to_string(),
            score: 0,
            group_id: placement.group_id.clone(),
            claimed_reward: false,
            claimed_at: None,
            entered_at: now,
        };

        let items = vec![
            TxItem::put(Record::Entry(entry.clone()), Condition::NotExists),
            TxItem::update(
                RecordKey::player(user_id),
                Mutation::Player(PlayerMutation::AdjustCoins(-requirements.cost)),
                Condition::PlayerEligible {
                    min_level: requirements.min_level,
                    min_coins: requirements.cost,
                },
            ),
            TxItem::update(
                RecordKey::tournament(tournament_id),
                Mutation::Tournament(TournamentMutation::AdvanceCursor(placement.cursor)),
                Condition::TournamentOpenAt(observed),
            ),
        ];

        let receipt = match self.store.transact(items).await {
            Ok(receipt) => receipt,
            Err(err) => return Err(self.explain_rejection(err, user_id, tournament_id).await),
        };

        let remaining_coins = receipt
            .player(PLAYER_ITEM)
            .map(|p| p.coins)
            .unwrap_or(player.coins - requirements.cost);
        let entry = receipt.entry(ENTRY_ITEM).cloned().unwrap_or(entry);

        info!(
            tournament_id,
            user_id,
            group_id = %entry.group_id,
            group_index = placement.cursor.index,
            group_count = placement.cursor.count,
            remaining_coins,
            "Entry admitted"
        );

        Ok(Admission {
            entry,
            remaining_coins,
            cursor: placement.cursor,
        })
    }

    /// Name the predicate that sank an admission commit.
    ///
    /// Entry conflicts win over player failures, which win over the cursor.
    async fn explain_rejection(
        &self,
        err: TxError,
        user_id: &str,
        tournament_id: &str,
    ) -> DomainError {
        if matches!(err, TxError::Store(_)) {
            return store_failure(err);
        }

        if err.failed_at(ENTRY_ITEM) {
            return already_entered(user_id, tournament_id);
        }

        if err.failed_at(PLAYER_ITEM) {
            return match self.store.get_player(user_id).await {
                Err(e) => e.into(),
                Ok(None) => user_not_found(user_id),
                Ok(Some(player)) => match check_eligibility(&player, &self.rules.requirements) {
                    Err(e) => e,
                    Ok(()) => DomainError::conflict(
                        ConflictKind::RequirementsNotMet,
                        "Entry requirements were not met at commit time",
                    ),
                },
            };
        }

        if err.failed_at(TOURNAMENT_ITEM) {
            return match self.store.get_tournament(tournament_id).await {
                Err(e) => e.into(),
                Ok(Some(t)) if t.active => {
                    debug!(
                        tournament_id,
                        user_id,
                        group_index = t.cursor.index,
                        group_count = t.cursor.count,
                        "Lost group cursor race"
                    );
                    DomainError::conflict(
                        ConflictKind::OptimisticLock,
                        format!(
                            "Group placement for tournament {tournament_id} changed concurrently"
                        ),
                    )
                }
                Ok(_) => not_active(tournament_id),
            };
        }

        store_failure(err)
    }
}

pub(super) fn not_active(tournament_id: &str) -> DomainError {
    DomainError::validation(
        ValidationKind::TournamentNotActive,
        format!("Tournament {tournament_id} is not active"),
    )
}

pub(super) fn user_not_found(user_id: &str) -> DomainError {
    DomainError::not_found(NotFoundKind::User, format!("User {user_id} not found"))
}

fn already_entered(user_id: &str, tournament_id: &str) -> DomainError {
    DomainError::conflict(
        ConflictKind::AlreadyInTournament,
        format!("User {user_id} already entered tournament {tournament_id}"),
    )
}
