//! SeaORM -> StoreError translation.
//!
//! The sea-orm store converts every `sea_orm::DbErr` here; services then see
//! `StoreError` and map it to `DomainError` via `From`.

use tracing::{error, warn};

use crate::store::StoreError;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Translate a `DbErr` into a `StoreError` with a sanitized detail.
///
/// Precondition failures never reach this function: the store decides those
/// from affected-row counts. Constraint violations that do arrive here mean
/// a write slipped past its conditions and are reported as corruption.
pub fn map_db_err(e: sea_orm::DbErr) -> StoreError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Database unavailable");
            return StoreError::Unavailable("Database unavailable".into());
        }
        sea_orm::DbErr::Type(_) | sea_orm::DbErr::TryIntoErr { .. } => {
            error!(trace_id = %trace_id, raw_error = %error_msg, "Row could not be decoded");
            return StoreError::Corrupt("Stored row could not be decoded".into());
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || mentions_sqlstate(&error_msg, "23503")
        || mentions_sqlstate(&error_msg, "23514")
        || error_msg.contains("UNIQUE constraint failed")
        || error_msg.contains("FOREIGN KEY constraint failed")
        || error_msg.contains("CHECK constraint failed")
    {
        error!(trace_id = %trace_id, raw_error = %error_msg, "Constraint violation inside conditional commit");
        return StoreError::Corrupt("Constraint violation".into());
    }

    if mentions_sqlstate(&error_msg, "40001") || mentions_sqlstate(&error_msg, "40P01") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Serialization failure");
        return StoreError::Unavailable("Transaction aborted by the database; retry".into());
    }

    if error_msg.contains("timeout")
        || error_msg.contains("timed out")
        || error_msg.contains("pool")
        || error_msg.contains("database is locked")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Database timeout or pool issue");
        return StoreError::Timeout("Database timeout".into());
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    StoreError::Backend("Database operation failed".into())
}
