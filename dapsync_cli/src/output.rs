//! Run summary rendering

use anyhow::{Result, bail};
use colored::*;
use dapsync_core::{RunSummary, WorkflowResult};
use std::fmt::Write as _;

/// Output format for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Coloured table on stderr
    Human,
    /// Full summary as JSON on stdout
    Json,
    /// `completed/total` on stdout
    Minimal,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "minimal" => Ok(Self::Minimal),
            _ => bail!("Unknown output format: {}", s),
        }
    }

    /// Human output goes to stderr so stdout only carries status lines
    pub fn writes_to_stderr(self) -> bool {
        matches!(self, Self::Human)
    }
}

/// Render the summary in the given format
pub fn render_summary(summary: &RunSummary, format: OutputFormat, colorize: bool) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(render_human(summary, colorize)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Minimal => Ok(format!("{}/{}", summary.completed, summary.total())),
    }
}

fn render_human(summary: &RunSummary, colorize: bool) -> String {
    colored::control::set_override(colorize);

    let mut out = String::new();
    let _ = writeln!(out, "{}", "Sync Results".bold());
    let _ = writeln!(out, "{}", "━".repeat(40));

    let failed: Vec<_> = summary
        .reports
        .iter()
        .filter(|r| r.result == WorkflowResult::Failed)
        .collect();
    for report in &failed {
        let message = report.message.as_deref().unwrap_or("no details");
        let _ = writeln!(out, "  {} {}: {}", "✗".red(), report.table, message);
    }
    if !failed.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "  {}: {}",
        "Completed".green(),
        summary.completed.to_string().bold()
    );
    let _ = writeln!(
        out,
        "  {}: {}",
        "No table".yellow(),
        summary.no_table.to_string().bold()
    );
    let _ = writeln!(
        out,
        "  {}: {}",
        "Failed".red(),
        summary.failed.to_string().bold()
    );
    let _ = writeln!(out, "  Initialized: {}", summary.escalated);
    let _ = write!(
        out,
        "  Total: {} tables in {:.1}s",
        summary.total(),
        summary.elapsed_ms as f64 / 1000.0
    );

    colored::control::unset_override();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dapsync_core::outcome::{InitOutcome, SyncOutcome};
    use dapsync_core::{TableName, WorkflowReport};
    use std::time::Duration;

    fn report(table: &str, sync: SyncOutcome, result: WorkflowResult) -> WorkflowReport {
        WorkflowReport {
            table: TableName::new(table).unwrap(),
            sync,
            init: (sync == SyncOutcome::InitNeeded).then_some(match result {
                WorkflowResult::Completed => InitOutcome::Completed,
                _ => InitOutcome::Failed,
            }),
            result,
            message: result
                .is_failure()
                .then(|| "connection refused".to_string()),
            elapsed_ms: 5,
        }
    }

    fn summary() -> RunSummary {
        RunSummary::from_reports(
            vec![
                report("users", SyncOutcome::Completed, WorkflowResult::Completed),
                report("courses", SyncOutcome::NoTable, WorkflowResult::NoTable),
                report(
                    "enrollments",
                    SyncOutcome::InitNeeded,
                    WorkflowResult::Completed,
                ),
                report("grades", SyncOutcome::Failed, WorkflowResult::Failed),
            ],
            Duration::from_millis(1500),
        )
    }

    #[test]
    fn test_from_string() {
        assert_eq!(OutputFormat::from_string("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_string("text").unwrap(),
            OutputFormat::Human
        );
        assert!(OutputFormat::from_string("csv").is_err());
    }

    #[test]
    fn test_minimal() {
        let out = render_summary(&summary(), OutputFormat::Minimal, false).unwrap();
        assert_eq!(out, "2/4");
    }

    #[test]
    fn test_json() {
        let out = render_summary(&summary(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["completed"], 2);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["reports"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_human_lists_failures() {
        let out = render_summary(&summary(), OutputFormat::Human, false).unwrap();
        assert!(out.contains("grades: connection refused"));
        assert!(out.contains("Completed: 2"));
        assert!(out.contains("Initialized: 1"));
        assert!(out.contains("Total: 4 tables in 1.5s"));
        assert!(!out.contains("\x1b["));
    }
}
