//! Sync command orchestrator
//!
//! Wires the resolved configuration into the core orchestrator, prints the
//! run summary and maps the result to an exit status.

use crate::config::RunSettings;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, render_summary};
use dapsync_core::{
    AuditSink, DapCliPrimitives, Orchestrator, RunSummary, StdoutAuditSink, TablePrimitives,
    TableSet,
};
use log::{debug, warn};
use std::io::{self, Write};
use std::sync::Arc;

/// Sync command options
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub format: OutputFormat,
    /// Colour the human summary
    pub colorize: bool,
    /// Ask `dap` for the namespace's tables instead of using the configured list
    pub discover: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            colorize: false,
            discover: false,
        }
    }
}

/// Orchestrator for a full run over the configured tables
pub struct SyncOrchestrator {
    orchestrator: Orchestrator,
    tables: TableSet,
    options: SyncOptions,
}

impl SyncOrchestrator {
    /// Create an orchestrator that drives the `dap` executable and prints
    /// status lines to stdout
    pub fn new(settings: RunSettings, options: SyncOptions) -> Self {
        let primitives = Arc::new(DapCliPrimitives::new(settings.executable.clone()));
        Self::with_primitives(settings, primitives, Arc::new(StdoutAuditSink), options)
    }

    /// Create an orchestrator with explicit primitives and audit sink
    pub fn with_primitives(
        settings: RunSettings,
        primitives: Arc<dyn TablePrimitives>,
        audit: Arc<dyn AuditSink>,
        options: SyncOptions,
    ) -> Self {
        debug!(
            "Creating sync orchestrator for {} tables with options: {options:?}",
            settings.tables.len()
        );

        Self {
            orchestrator: Orchestrator::new(
                primitives,
                settings.session,
                audit,
                settings.orchestrator,
            ),
            tables: settings.tables,
            options,
        }
    }

    /// Run every table workflow and return the summary
    pub async fn run(self) -> CliResult<RunSummary> {
        let tables = if self.options.discover {
            self.orchestrator.discover_tables().await.map_err(|e| {
                CliError::general(&format!("Table discovery failed: {e}"))
                    .with_source(Box::new(e))
            })?
        } else {
            self.tables
        };

        Ok(self.orchestrator.run(tables).await)
    }

    /// Run, print the summary and fail when any table failed
    pub async fn execute(self) -> CliResult<RunSummary> {
        let options = self.options;
        let summary = self.run().await?;

        let rendered = render_summary(&summary, options.format, options.colorize)?;
        let written = if options.format.writes_to_stderr() {
            writeln!(io::stderr().lock(), "\n{rendered}")
        } else {
            writeln!(io::stdout().lock(), "{rendered}")
        };
        if let Err(e) = written {
            warn!("Could not write run summary: {e}");
        }

        check_summary(&summary)?;
        Ok(summary)
    }
}

/// Map failed tables to the sync-failure exit status
pub fn check_summary(summary: &RunSummary) -> CliResult<()> {
    if summary.has_failures() {
        let failed: Vec<String> = summary
            .failed_tables()
            .into_iter()
            .map(|t| t.to_string())
            .collect();
        return Err(CliError::sync_failures(&failed));
    }
    Ok(())
}
