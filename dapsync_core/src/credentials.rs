//! DAP API credentials
//!
//! Created once per run from a client id and secret and shared read-only by
//! every table workflow.

use crate::error::{Result, ValidationError};
use crate::secure_string::SecureString;

/// Client credentials for the Data Access Platform
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: SecureString,
}

impl Credentials {
    /// Build credentials, rejecting blank components
    pub fn create(client_id: impl Into<String>, client_secret: impl Into<SecureString>) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() {
            return Err(ValidationError::missing_credential("client_id").into());
        }
        if client_secret.is_blank() {
            return Err(ValidationError::missing_credential("client_secret").into());
        }

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &SecureString {
        &self.client_secret
    }
}
