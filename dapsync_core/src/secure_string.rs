//! Zeroizing string for client secrets and connection strings
//!
//! Values never show up in `Debug` or `Display` output, so a
//! [`RunSession`](crate::session::RunSession) can be logged freely.

use std::fmt;
use zeroize::Zeroize;

/// A string whose bytes are wiped when dropped
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    /// Wrap a sensitive value
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Borrow the secret. Callers must not log the result.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// True when the secret is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.inner.trim().is_empty()
    }

    /// Constant-time comparison
    pub fn constant_time_eq(&self, other: &Self) -> bool {
        let a = self.inner.as_bytes();
        let b = other.inner.as_bytes();
        if a.len() != b.len() {
            return false;
        }

        let mut result = 0u8;
        for (x, y) in a.iter().zip(b.iter()) {
            result |= x ^ y;
        }
        result == 0
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString(***)")
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        self.constant_time_eq(other)
    }
}

impl Eq for SecureString {}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
