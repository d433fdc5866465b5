pub mod leaderboards;
pub mod players;
pub mod tournament_flow;

pub use leaderboards::LeaderboardService;
pub use players::PlayerService;
pub use tournament_flow::{Admission, ClaimOutcome, TournamentFlowService};
