//! Aggregate result of one run

use crate::outcome::WorkflowResult;
use crate::tables::TableName;
use crate::workflow::WorkflowReport;
use serde::Serialize;
use std::time::Duration;

/// Every table's report plus counts per result kind
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub reports: Vec<WorkflowReport>,
    pub completed: usize,
    pub no_table: usize,
    pub failed: usize,
    /// Tables that went through initialization, whatever the result
    pub escalated: usize,
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn from_reports(reports: Vec<WorkflowReport>, elapsed: Duration) -> Self {
        let count = |kind: WorkflowResult| reports.iter().filter(|r| r.result == kind).count();

        Self {
            completed: count(WorkflowResult::Completed),
            no_table: count(WorkflowResult::NoTable),
            failed: count(WorkflowResult::Failed),
            escalated: reports.iter().filter(|r| r.escalated()).count(),
            elapsed_ms: elapsed.as_millis() as u64,
            reports,
        }
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn failed_tables(&self) -> Vec<&TableName> {
        self.reports
            .iter()
            .filter(|r| r.result.is_failure())
            .map(|r| &r.table)
            .collect()
    }

    pub fn report_for(&self, table: &str) -> Option<&WorkflowReport> {
        self.reports.iter().find(|r| r.table.as_str() == table)
    }
}
