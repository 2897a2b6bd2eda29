//! Interface to the external incremental-sync and full-init primitives

use crate::error::PrimitiveError;
use crate::session::RunSession;
use crate::tables::TableName;
use async_trait::async_trait;

pub mod dap_cli;

pub use dap_cli::DapCliPrimitives;

/// Table-scoped data movement
///
/// Implementations must be safe to call concurrently for distinct tables.
/// Retries and backoff, if any, live behind this trait.
#[async_trait]
pub trait TablePrimitives: Send + Sync {
    /// Apply the changes since the last successful sync to `table`
    async fn sync(&self, session: &RunSession, table: &TableName) -> Result<(), PrimitiveError>;

    /// Create the destination schema for `table` and perform a full load
    async fn init(&self, session: &RunSession, table: &TableName) -> Result<(), PrimitiveError>;

    /// Names of every table published in the session's namespace
    async fn list_tables(&self, session: &RunSession) -> Result<Vec<String>, PrimitiveError>;
}
