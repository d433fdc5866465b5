//! Infrastructure layer - database connections, error translation and state assembly.

pub mod db;
pub mod db_errors;
pub mod state;
