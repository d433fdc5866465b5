//! Tournament flow: lifecycle, admission, scoring, ranking and claims.
//!
//! Every operation that touches more than one record goes through a single
//! `TournamentStore::transact` commit. Nothing here retries; a lost race on
//! the group counter comes back as `ConflictKind::OptimisticLock`.

mod admission;
mod claims;
mod lifecycle;
mod ranking;
mod scoring;

use std::sync::Arc;

use crate::config::rules::TournamentRules;
use crate::domain::clock::Clock;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::store::{TournamentStore, TxError};

pub use admission::Admission;
pub use claims::ClaimOutcome;

pub struct TournamentFlowService {
    store: Arc<dyn TournamentStore>,
    rules: TournamentRules,
    clock: Arc<dyn Clock>,
}

impl TournamentFlowService {
    pub fn new(
        store: Arc<dyn TournamentStore>,
        rules: TournamentRules,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            rules,
            clock,
        }
    }

    pub fn rules(&self) -> &TournamentRules {
        &self.rules
    }
}

/// Store failures of a commit; condition failures are mapped by each operation.
fn store_failure(err: TxError) -> DomainError {
    match err {
        TxError::Store(e) => e.into(),
        TxError::ConditionFailed { failed } => DomainError::conflict(
            ConflictKind::RequirementsNotMet,
            format!("commit conditions failed at items {failed:?}"),
        ),
    }
}
