//! Errors raised by the external sync and init primitives

use crate::classify::NOT_INITIALIZED_PATTERN;
use thiserror::Error;

/// Failure signalled by a [`TablePrimitives`](crate::primitives::TablePrimitives) call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// The table has no source or destination mapping
    #[error("Table '{table}' does not exist: {message}")]
    NonExistingTable { table: String, message: String },

    /// The destination table was never initialized
    #[error("Table '{table}' not initialized")]
    NotInitialized { table: String },

    /// Any other failure reported by the primitive
    #[error("{message}")]
    Other { message: String },
}

impl PrimitiveError {
    /// Create a non-existing table error
    pub fn non_existing_table(table: &str, message: impl Into<String>) -> Self {
        Self::NonExistingTable {
            table: table.to_string(),
            message: message.into(),
        }
    }

    /// Create a typed not-initialized error
    pub fn not_initialized(table: &str) -> Self {
        Self::NotInitialized {
            table: table.to_string(),
        }
    }

    /// Create a generic primitive error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// True when the destination schema is missing and init would fix it
    ///
    /// A missing table is never a missing schema, whatever its message says.
    pub fn is_missing_schema(&self) -> bool {
        match self {
            Self::NonExistingTable { .. } => false,
            Self::NotInitialized { .. } => true,
            Self::Other { message } => message.to_lowercase().contains(NOT_INITIALIZED_PATTERN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_existing_table_display() {
        let error = PrimitiveError::non_existing_table("courses", "no such mapping");
        assert!(error.to_string().contains("courses"));
        assert!(error.to_string().contains("does not exist"));
        assert!(error.to_string().contains("no such mapping"));
    }

    #[test]
    fn test_not_initialized_display() {
        let error = PrimitiveError::not_initialized("enrollments");
        assert_eq!(error.to_string(), "Table 'enrollments' not initialized");
    }

    #[test]
    fn test_is_missing_schema() {
        assert!(PrimitiveError::not_initialized("users").is_missing_schema());
        assert!(PrimitiveError::other("Table NOT INITIALIZED yet").is_missing_schema());
        assert!(!PrimitiveError::other("timeout").is_missing_schema());
        assert!(
            !PrimitiveError::non_existing_table("users", "not initialized").is_missing_schema()
        );
    }

    #[test]
    fn test_other_keeps_message_verbatim() {
        let error = PrimitiveError::other("connection refused");
        assert_eq!(error.to_string(), "connection refused");
    }
}
