//! dapsync core library
//!
//! Replicates a fixed set of DAP tables into a destination database. Each
//! table runs an independent sync-or-init workflow; the orchestrator fans
//! them out concurrently and collects one terminal report per table.

pub mod audit;
pub mod classify;
pub mod credentials;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod primitives;
pub mod secure_string;
pub mod session;
pub mod summary;
pub mod tables;
pub mod workflow;

// Re-export main types
pub use audit::{AuditSink, MemoryAuditSink, StdoutAuditSink, record_guarded};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use outcome::{InitOutcome, Phase, StatusLine, SyncOutcome, WorkflowResult};
pub use primitives::{DapCliPrimitives, TablePrimitives};
pub use secure_string::SecureString;
pub use session::{DEFAULT_NAMESPACE, RunSession};
pub use summary::RunSummary;
pub use tables::{CANVAS_TABLES, TableName, TableSet};
pub use workflow::{TableWorkflow, WorkflowReport, WorkflowState};
