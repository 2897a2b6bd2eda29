//! Fan-out of table workflows
//!
//! Every table gets its own tokio task. By default all of them start at once;
//! `max_concurrency` caps the number in flight. A table's failure never
//! reaches its siblings or the caller.

use crate::audit::{AuditSink, record_guarded};
use crate::error::{InternalError, Result};
use crate::outcome::{StatusLine, SyncOutcome};
use crate::primitives::TablePrimitives;
use crate::session::RunSession;
use crate::summary::RunSummary;
use crate::tables::{TableName, TableSet};
use crate::workflow::{TableWorkflow, WorkflowReport};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Orchestrator tuning
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Upper bound on concurrently running workflows. `None` or `Some(0)`
    /// runs every table at once.
    pub max_concurrency: Option<usize>,
    /// Deadline for each table's sync-or-init sequence
    pub table_timeout: Option<Duration>,
}

/// Runs one workflow per table and collects the reports
pub struct Orchestrator {
    primitives: Arc<dyn TablePrimitives>,
    workflow: Arc<TableWorkflow>,
    audit: Arc<dyn AuditSink>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        primitives: Arc<dyn TablePrimitives>,
        session: RunSession,
        audit: Arc<dyn AuditSink>,
        config: OrchestratorConfig,
    ) -> Self {
        let workflow = TableWorkflow::new(primitives.clone(), Arc::new(session), audit.clone())
            .with_deadline(config.table_timeout);

        Self {
            primitives,
            workflow: Arc::new(workflow),
            audit,
            config,
        }
    }

    /// Ask the primitives for every table in the session's namespace
    pub async fn discover_tables(&self) -> Result<TableSet> {
        let session = self.workflow.session();
        let names = self.primitives.list_tables(session).await?;
        info!(
            "Discovered {} tables in namespace '{}'",
            names.len(),
            session.namespace()
        );
        TableSet::from_names(names)
    }

    /// Run `sync_or_init` for every table and wait for all of them
    pub async fn run(&self, tables: TableSet) -> RunSummary {
        let started = Instant::now();
        let limit = self.config.max_concurrency.filter(|n| *n > 0);
        let semaphore = limit.map(|n| Arc::new(Semaphore::new(n)));

        info!(
            "Starting {} table workflows in namespace '{}' (concurrency: {})",
            tables.len(),
            self.workflow.session().namespace(),
            limit.map_or_else(|| "unbounded".to_string(), |n| n.to_string())
        );

        let handles: Vec<(TableName, JoinHandle<WorkflowReport>)> = tables
            .into_iter()
            .map(|table| {
                let workflow = self.workflow.clone();
                let semaphore = semaphore.clone();
                let task_table = table.clone();

                let handle = tokio::spawn(async move {
                    // The semaphore is never closed, so acquire only fails if
                    // that changes; run unbounded in that case.
                    let _permit = match semaphore {
                        Some(sem) => sem.acquire_owned().await.ok(),
                        None => None,
                    };
                    workflow.sync_or_init(&task_table).await
                });

                (table, handle)
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (table, handle) in handles {
            match handle.await {
                Ok(report) => {
                    debug!("Table {table} finished: {}", report.result);
                    reports.push(report);
                }
                Err(e) => {
                    let error = InternalError::task_join(e.to_string());
                    error!("Table {table} task did not complete: {error}");
                    record_guarded(
                        self.audit.as_ref(),
                        &StatusLine::sync(&table, SyncOutcome::Failed, Some(error.to_string())),
                    );
                    reports.push(WorkflowReport::unjoined(table, &error));
                }
            }
        }

        let summary = RunSummary::from_reports(reports, started.elapsed());
        info!(
            "Run complete: {} completed, {} no table, {} failed ({} escalated) in {}ms",
            summary.completed,
            summary.no_table,
            summary.failed,
            summary.escalated,
            summary.elapsed_ms
        );
        summary
    }
}
