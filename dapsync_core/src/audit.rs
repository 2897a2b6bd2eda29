//! Audit trail for table outcomes
//!
//! Status lines are the only persisted record of a run, so every workflow
//! phase writes exactly one of them through an [`AuditSink`].

use crate::outcome::StatusLine;
use log::{error, info, warn};
use std::io::{self, Write};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

/// Destination for status lines
pub trait AuditSink: Send + Sync {
    /// Record one status line
    fn record(&self, line: &StatusLine);
}

/// Record `line`, containing any panic raised by the sink
///
/// A broken sink loses the line but never changes a table's outcome.
pub fn record_guarded(sink: &dyn AuditSink, line: &StatusLine) {
    if catch_unwind(AssertUnwindSafe(|| sink.record(line))).is_err() {
        error!("Audit sink panicked while recording '{line}'");
    }
}

/// Prints each line to stdout and mirrors it to the log
///
/// Write errors (a closed pipe, for instance) are logged, never raised.
pub struct StdoutAuditSink;

impl StdoutAuditSink {
    fn emit(out: &mut impl Write, line: &StatusLine) {
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!("Could not write status line '{line}': {e}");
        }
        match &line.message {
            Some(message) => warn!("{line}: {message}"),
            None => info!("{line}"),
        }
    }
}

impl AuditSink for StdoutAuditSink {
    fn record(&self, line: &StatusLine) {
        Self::emit(&mut io::stdout().lock(), line);
    }
}

/// Keeps lines in memory, in recording order
#[derive(Default, Clone)]
pub struct MemoryAuditSink {
    lines: Arc<Mutex<Vec<StatusLine>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded lines
    pub fn lines(&self) -> Vec<StatusLine> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Recorded lines rendered as text
    pub fn rendered(&self) -> Vec<String> {
        self.lines().iter().map(ToString::to_string).collect()
    }

    /// Lines recorded for one table
    pub fn lines_for(&self, table: &str) -> Vec<String> {
        self.lines()
            .iter()
            .filter(|line| line.table.as_str() == table)
            .map(ToString::to_string)
            .collect()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, line: &StatusLine) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.clone());
        }
    }
}
