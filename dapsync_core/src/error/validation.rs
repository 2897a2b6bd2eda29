//! Validation related error types

use thiserror::Error;

/// Validation and configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Table identifiers must not be blank
    #[error("Table name must not be empty")]
    EmptyTableName,

    /// A credential component was missing or blank
    #[error("Missing credential: {field}")]
    MissingCredential { field: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ValidationError {
    /// Create a missing credential error
    pub fn missing_credential(field: &str) -> Self {
        Self::MissingCredential {
            field: field.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.to_string(),
        }
    }
}
