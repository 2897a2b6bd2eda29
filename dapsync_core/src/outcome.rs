//! Sync, init and terminal workflow outcomes

use crate::tables::TableName;
use serde::Serialize;
use std::fmt;

/// Classification of one incremental sync attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SyncOutcome {
    Completed,
    NoTable,
    InitNeeded,
    Failed,
}

/// Classification of one full initialization attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InitOutcome {
    Completed,
    Failed,
}

/// Terminal status surfaced for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WorkflowResult {
    Completed,
    NoTable,
    Failed,
}

impl SyncOutcome {
    /// Terminal result when no escalation happens, `None` for `InitNeeded`
    pub fn terminal(self) -> Option<WorkflowResult> {
        match self {
            Self::Completed => Some(WorkflowResult::Completed),
            Self::NoTable => Some(WorkflowResult::NoTable),
            Self::Failed => Some(WorkflowResult::Failed),
            Self::InitNeeded => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::NoTable => "NoTable",
            Self::InitNeeded => "InitNeeded",
            Self::Failed => "Failed",
        }
    }
}

impl InitOutcome {
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

impl From<InitOutcome> for WorkflowResult {
    fn from(outcome: InitOutcome) -> Self {
        match outcome {
            InitOutcome::Completed => Self::Completed,
            InitOutcome::Failed => Self::Failed,
        }
    }
}

impl WorkflowResult {
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::NoTable => "NoTable",
            Self::Failed => "Failed",
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for InitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for WorkflowResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Workflow phase a status line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Sync,
    Init,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync => f.write_str("sync"),
            Self::Init => f.write_str("init"),
        }
    }
}

/// One audit line, rendered as `"<outcome> <phase> table: <table>"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub table: TableName,
    pub phase: Phase,
    pub outcome: &'static str,
    /// Underlying failure message, if any. Not part of the rendered line.
    pub message: Option<String>,
}

impl StatusLine {
    pub fn sync(table: &TableName, outcome: SyncOutcome, message: Option<String>) -> Self {
        Self {
            table: table.clone(),
            phase: Phase::Sync,
            outcome: outcome.label(),
            message,
        }
    }

    pub fn init(table: &TableName, outcome: InitOutcome, message: Option<String>) -> Self {
        Self {
            table: table.clone(),
            phase: Phase::Init,
            outcome: outcome.label(),
            message,
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} table: {}", self.outcome, self.phase, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> TableName {
        TableName::new(name).unwrap()
    }

    #[test]
    fn test_sync_outcome_terminal_mapping() {
        assert_eq!(
            SyncOutcome::Completed.terminal(),
            Some(WorkflowResult::Completed)
        );
        assert_eq!(SyncOutcome::NoTable.terminal(), Some(WorkflowResult::NoTable));
        assert_eq!(SyncOutcome::Failed.terminal(), Some(WorkflowResult::Failed));
        assert_eq!(SyncOutcome::InitNeeded.terminal(), None);
    }

    #[test]
    fn test_init_outcome_into_result() {
        assert_eq!(
            WorkflowResult::from(InitOutcome::Completed),
            WorkflowResult::Completed
        );
        assert_eq!(
            WorkflowResult::from(InitOutcome::Failed),
            WorkflowResult::Failed
        );
    }

    #[test]
    fn test_sync_status_line_format() {
        let line = StatusLine::sync(&table("users"), SyncOutcome::Completed, None);
        assert_eq!(line.to_string(), "Completed sync table: users");
    }

    #[test]
    fn test_init_status_line_format() {
        let line = StatusLine::init(
            &table("assignments"),
            InitOutcome::Failed,
            Some("disk full".to_string()),
        );
        assert_eq!(line.to_string(), "Failed init table: assignments");
    }

    #[test]
    fn test_no_table_label() {
        let line = StatusLine::sync(&table("courses"), SyncOutcome::NoTable, None);
        assert_eq!(line.to_string(), "NoTable sync table: courses");
    }
}
