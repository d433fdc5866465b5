//! Admission rules shared by the tournament services.

use crate::domain::eligibility::EntryRequirements;
use crate::domain::schedule::EntryWindow;

/// Cost, level floor and daily entry window applied on admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TournamentRules {
    pub requirements: EntryRequirements,
    pub window: EntryWindow,
}

impl TournamentRules {
    pub fn new(requirements: EntryRequirements, window: EntryWindow) -> Self {
        Self {
            requirements,
            window,
        }
    }
}
