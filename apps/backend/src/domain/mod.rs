//! Domain layer: pure tournament rules, no I/O.

pub mod clock;
pub mod eligibility;
pub mod grouping;
pub mod models;
pub mod ranking;
pub mod rewards;
pub mod schedule;

#[cfg(test)]
mod tests_props_grouping;

// Re-exports for ergonomics
pub use clock::{Clock, FixedClock, SystemClock};
pub use eligibility::{check_eligibility, EntryRequirements};
pub use grouping::{group_id, GroupCursor, Placement, GROUP_CAPACITY};
pub use models::{Entry, Player, Tournament};
pub use ranking::{rank_of, sort_group_view};
pub use rewards::reward_for_rank;
pub use schedule::{tournament_id_for, EntryWindow};
