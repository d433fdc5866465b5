pub mod app;
pub mod db;
pub mod rules;

pub use app::{Config, StoreBackend};
pub use rules::TournamentRules;
