//! Error codes for the tournament API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Path or query parameter could not be parsed
    InvalidParameter,
    /// Username empty or too long
    InvalidUsername,
    /// Country code is not two ASCII letters
    InvalidCountry,
    /// New level does not exceed the current one
    InvalidLevelIncrease,
    /// Score increments must be positive
    InvalidScoreIncrement,

    // Tournament rules
    /// Player level below the entry minimum
    UserLevelTooLow,
    /// Player balance below the entry cost
    InsufficientCoins,
    /// Tournament has ended
    TournamentNotActive,
    /// Rewards can only be claimed after the tournament ends
    TournamentStillActive,
    /// Entries are closed for the day
    EntryWindowClosed,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// Tournament not found
    TournamentNotFound,
    /// User has not entered the tournament
    TournamentEntryNotFound,
    /// Entry missing from its group's ranked view
    UserNotFoundInLeaderboard,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Duplicate entry or duplicate same-day start
    AlreadyInTournament,
    /// Tournament was already ended
    TournamentAlreadyInactive,
    /// Reward was already paid out
    RewardAlreadyClaimed,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Conditional commit failed for an unidentified reason
    RequirementsNotMet,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Store error
    StoreError,
    /// Store unavailable
    StoreUnavailable,
    /// Store timeout (gateway timeout)
    StoreTimeout,
    /// Internal server error
    Internal,
    /// Internal server error (explicit problem code)
    InternalError,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidCountry => "INVALID_COUNTRY",
            Self::InvalidLevelIncrease => "INVALID_LEVEL_INCREASE",
            Self::InvalidScoreIncrement => "INVALID_SCORE_INCREMENT",

            Self::UserLevelTooLow => "USER_LEVEL_TOO_LOW",
            Self::InsufficientCoins => "INSUFFICIENT_COINS",
            Self::TournamentNotActive => "TOURNAMENT_NOT_ACTIVE",
            Self::TournamentStillActive => "TOURNAMENT_STILL_ACTIVE",
            Self::EntryWindowClosed => "ENTRY_WINDOW_CLOSED",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TournamentNotFound => "TOURNAMENT_NOT_FOUND",
            Self::TournamentEntryNotFound => "TOURNAMENT_ENTRY_NOT_FOUND",
            Self::UserNotFoundInLeaderboard => "USER_NOT_FOUND_IN_LEADERBOARD",
            Self::NotFound => "NOT_FOUND",

            Self::AlreadyInTournament => "ALREADY_IN_TOURNAMENT",
            Self::TournamentAlreadyInactive => "TOURNAMENT_ALREADY_INACTIVE",
            Self::RewardAlreadyClaimed => "REWARD_ALREADY_CLAIMED",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::RequirementsNotMet => "REQUIREMENTS_NOT_MET",
            Self::Conflict => "CONFLICT",

            Self::StoreError => "STORE_ERROR",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::StoreTimeout => "STORE_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
