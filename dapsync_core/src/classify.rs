//! Sync and init failure classification
//!
//! The substring match on [`NOT_INITIALIZED_PATTERN`] (see
//! [`PrimitiveError::is_missing_schema`]) exists for primitives that cannot
//! yet return [`PrimitiveError::NotInitialized`].

use crate::error::PrimitiveError;
use crate::outcome::{InitOutcome, SyncOutcome};

/// Message fragment that marks a destination table as never initialized
pub const NOT_INITIALIZED_PATTERN: &str = "not initialized";

/// Classify a failed sync attempt. First match wins:
/// missing table, then missing schema, then everything else.
pub fn classify_sync_failure(error: &PrimitiveError) -> SyncOutcome {
    match error {
        PrimitiveError::NonExistingTable { .. } => SyncOutcome::NoTable,
        e if e.is_missing_schema() => SyncOutcome::InitNeeded,
        _ => SyncOutcome::Failed,
    }
}

/// Classify the result of a sync primitive call
pub fn classify_sync(result: &Result<(), PrimitiveError>) -> SyncOutcome {
    match result {
        Ok(()) => SyncOutcome::Completed,
        Err(e) => classify_sync_failure(e),
    }
}

/// Classify the result of an init primitive call. Every failure is `Failed`.
pub fn classify_init(result: &Result<(), PrimitiveError>) -> InitOutcome {
    match result {
        Ok(()) => InitOutcome::Completed,
        Err(_) => InitOutcome::Failed,
    }
}
