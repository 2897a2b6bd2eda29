//! Error types for the dapsync core library
//!
//! Errors are grouped the same way the workflow sees them:
//! - Primitive errors: failures reported by the external sync/init calls
//! - Validation errors: bad table names, credentials or configuration
//! - Internal errors: panics, timeouts and state machine violations

use thiserror::Error;

pub mod internal;
pub mod primitive;
pub mod validation;

pub use internal::InternalError;
pub use primitive::PrimitiveError;
pub use validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the dapsync core library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Errors from the external primitives
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal library errors
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_from_primitive_error() {
        let error: Error = PrimitiveError::other("boom").into();
        assert!(matches!(error, Error::Primitive(PrimitiveError::Other { .. })));
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn test_from_validation_error() {
        let error: Error = ValidationError::EmptyTableName.into();
        assert!(matches!(
            error,
            Error::Validation(ValidationError::EmptyTableName)
        ));
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = Error::Internal(InternalError::task_join("cancelled"));
        let _: &dyn StdError = &error;
        assert!(error.to_string().contains("cancelled"));
    }
}
