//! Mock implementations for testing

pub mod audit;
pub mod primitives;

pub use audit::PanickingAuditSink;
pub use primitives::{MockBehavior, MockPrimitives};
