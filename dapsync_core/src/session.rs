//! Shared, immutable run parameters

use crate::credentials::Credentials;
use crate::error::{Result, ValidationError};
use crate::secure_string::SecureString;

/// Default DAP namespace
pub const DEFAULT_NAMESPACE: &str = "canvas";

/// Parameters shared read-only by every table workflow of one run
#[derive(Debug, Clone)]
pub struct RunSession {
    base_url: String,
    namespace: String,
    credentials: Credentials,
    connection_string: SecureString,
}

impl RunSession {
    /// Create a session, validating the non-secret parameters
    pub fn new(
        base_url: impl Into<String>,
        namespace: impl Into<String>,
        credentials: Credentials,
        connection_string: impl Into<SecureString>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let namespace = namespace.into();
        let connection_string = connection_string.into();

        if base_url.trim().is_empty() {
            return Err(ValidationError::invalid_configuration("API base URL is empty").into());
        }
        if namespace.trim().is_empty() {
            return Err(ValidationError::invalid_configuration("namespace is empty").into());
        }
        if connection_string.is_blank() {
            return Err(
                ValidationError::invalid_configuration("connection string is empty").into(),
            );
        }

        Ok(Self {
            base_url,
            namespace,
            credentials,
            connection_string,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn connection_string(&self) -> &SecureString {
        &self.connection_string
    }
}
