use tracing::{debug, info};

use super::admission::user_not_found;
use super::lifecycle::tournament_not_found;
use super::scoring::entry_not_found;
use super::{store_failure, TournamentFlowService};
use crate::domain::rewards::reward_for_rank;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::store::{Condition, EntryMutation, Mutation, PlayerMutation, RecordKey, TxItem};

const ENTRY_ITEM: usize = 0;
const PLAYER_ITEM: usize = 1;

/// Result of a claim that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Reward paid; `balance` is the player's balance after the credit.
    Rewarded { rank: u32, reward: i64, balance: i64 },
    /// Ranked outside the payout tiers. The entry stays unclaimed.
    NoRewardForRank { rank: u32 },
    /// The group view did not contain the entry.
    Unranked,
}

impl ClaimOutcome {
    pub fn rank(&self) -> Option<u32> {
        match self {
            ClaimOutcome::Rewarded { rank, .. } | ClaimOutcome::NoRewardForRank { rank } => {
                Some(*rank)
            }
            ClaimOutcome::Unranked => None,
        }
    }

    pub fn reward(&self) -> i64 {
        match self {
            ClaimOutcome::Rewarded { reward, .. } => *reward,
            _ => 0,
        }
    }
}

impl TournamentFlowService {
    /// Pay the group reward for an ended tournament, at most once per entry.
    pub async fn claim_reward(
        &self,
        tournament_id: &str,
        user_id: &str,
    ) -> Result<ClaimOutcome, DomainError> {
        let tournament = self
            .store
            .get_tournament(tournament_id)
            .await?
            .ok_or_else(|| tournament_not_found(tournament_id))?;
        if tournament.active {
            return Err(DomainError::validation(
                ValidationKind::TournamentStillActive,
                format!("Tournament {tournament_id} is still active"),
            ));
        }

        let entry = self
            .store
            .get_entry(tournament_id, user_id)
            .await?
            .ok_or_else(|| entry_not_found(tournament_id, user_id))?;
        if entry.claimed_reward {
            return Err(already_claimed(tournament_id, user_id));
        }

        let Some(rank) = self.rank_in_group(&entry).await? else {
            return Ok(ClaimOutcome::Unranked);
        };

        let reward = reward_for_rank(rank);
        if reward == 0 {
            debug!(tournament_id, user_id, rank, "No reward for rank");
            return Ok(ClaimOutcome::NoRewardForRank { rank });
        }

        let items = vec![
            TxItem::update(
                RecordKey::entry(tournament_id, user_id),
                Mutation::Entry(EntryMutation::MarkClaimed(self.clock.now())),
                Condition::EntryUnclaimed,
            ),
            TxItem::update(
                RecordKey::player(user_id),
                Mutation::Player(PlayerMutation::AdjustCoins(reward)),
                Condition::Exists,
            ),
        ];

        match self.store.transact(items).await {
            Ok(receipt) => {
                let balance = receipt
                    .player(PLAYER_ITEM)
                    .map(|p| p.coins)
                    .ok_or_else(|| user_not_found(user_id))?;
                info!(
                    tournament_id,
                    user_id,
                    group_id = %entry.group_id,
                    rank,
                    reward,
                    balance,
                    "Reward claimed"
                );
                Ok(ClaimOutcome::Rewarded {
                    rank,
                    reward,
                    balance,
                })
            }
            Err(e) if e.failed_at(ENTRY_ITEM) => {
                debug!(tournament_id, user_id, "Lost claim race");
                Err(already_claimed(tournament_id, user_id))
            }
            Err(e) if e.failed_at(PLAYER_ITEM) => Err(user_not_found(user_id)),
            Err(e) => Err(store_failure(e)),
        }
    }
}

fn already_claimed(tournament_id: &str, user_id: &str) -> DomainError {
    DomainError::conflict(
        ConflictKind::RewardAlreadyClaimed,
        format!("Reward for user {user_id} in tournament {tournament_id} was already claimed"),
    )
}
