//! Backend test support utilities
//!
//! Shared by the `tourney` unit and integration tests: idempotent logging
//! setup, Problem Details assertions and unique fixture names.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
