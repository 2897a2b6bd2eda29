//! Audit sinks that misbehave

use dapsync_core::{AuditSink, StatusLine};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Panics on every line, like `println!` on a closed stdout
#[derive(Default)]
pub struct PanickingAuditSink {
    attempts: AtomicUsize,
}

impl PanickingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines the workflows tried to record
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl AuditSink for PanickingAuditSink {
    fn record(&self, line: &StatusLine) {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        panic!("failed printing '{line}' to stdout: Broken pipe");
    }
}
