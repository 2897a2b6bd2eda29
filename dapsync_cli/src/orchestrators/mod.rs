//! Command orchestrators
//!
//! Coordinate between the CLI layer and the core library services.

pub mod sync_orchestrator;
