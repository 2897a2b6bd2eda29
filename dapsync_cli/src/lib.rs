//! dapsync CLI library
//!
//! Configuration, output and orchestration used by the `dapsync` binary.

pub mod config;
pub mod error;
pub mod orchestrators;
pub mod output;
pub mod terminal;
