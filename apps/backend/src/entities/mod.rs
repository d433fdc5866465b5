pub mod players;
pub mod tournament_entries;
pub mod tournaments;

pub use players::Entity as Players;
pub use players::Model as PlayerRow;
pub use tournament_entries::Entity as TournamentEntries;
pub use tournament_entries::Model as EntryRow;
pub use tournaments::Entity as Tournaments;
pub use tournaments::Model as TournamentRow;
