//! Internal library error types

use std::time::Duration;
use thiserror::Error;

/// Internal errors raised while driving a table workflow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// The workflow tried to move between two states that are not connected
    #[error("Invalid workflow transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    /// A primitive or the workflow itself panicked
    #[error("Workflow panicked: {message}")]
    Panicked { message: String },

    /// The per-table deadline elapsed
    #[error("Workflow timed out after {}s", .after.as_secs_f64())]
    TimedOut { after: Duration },

    /// The spawned table task could not be joined
    #[error("Table task failed to join: {message}")]
    TaskJoin { message: String },
}

impl InternalError {
    /// Create an invalid transition error
    pub fn invalid_transition(from: impl ToString, event: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            event: event.to_string(),
        }
    }

    /// Create a panic error from a `catch_unwind` payload
    pub fn panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked { message }
    }

    /// Create a timeout error
    pub fn timed_out(after: Duration) -> Self {
        Self::TimedOut { after }
    }

    /// Create a task join error
    pub fn task_join(message: impl Into<String>) -> Self {
        Self::TaskJoin {
            message: message.into(),
        }
    }
}
