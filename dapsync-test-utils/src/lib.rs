//! Test utilities for dapsync
//!
//! Scriptable primitives and fixtures for exercising table workflows
//! without a DAP endpoint or a destination database.

pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use fixtures::{table, table_set, test_session};
pub use mocks::{MockBehavior, MockPrimitives, PanickingAuditSink};
