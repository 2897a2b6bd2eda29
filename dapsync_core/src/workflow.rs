//! Per-table sync-or-init workflow
//!
//! A table moves `Start → Syncing`, and from there to one of the terminal
//! states `Completed`, `NoTable`, `Failed`, or escalates to `Initializing`
//! when the destination schema is missing. `Initializing` ends in `Completed`
//! or `Failed`. Init runs at most once per workflow and only on the
//! missing-schema signal.
//!
//! [`TableWorkflow::sync_or_init`] never fails: panics, deadline expiry and
//! state machine violations all end as a `Failed` report with one status line
//! for the phase that was in flight.

use crate::audit::{AuditSink, record_guarded};
use crate::classify::{classify_init, classify_sync};
use crate::error::InternalError;
use crate::outcome::{InitOutcome, StatusLine, SyncOutcome, WorkflowResult};
use crate::primitives::TablePrimitives;
use crate::session::RunSession;
use crate::tables::TableName;
use futures::FutureExt;
use log::{debug, error, warn};
use serde::Serialize;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// State of one table workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowState {
    Start,
    Syncing,
    Initializing,
    Completed,
    NoTable,
    Failed,
}

/// Input that drives a [`WorkflowState`] transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    Begin,
    Synced(SyncOutcome),
    Initialized(InitOutcome),
    /// Unexpected failure outside the primitives
    Aborted,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begin => f.write_str("begin"),
            Self::Synced(outcome) => write!(f, "sync {outcome}"),
            Self::Initialized(outcome) => write!(f, "init {outcome}"),
            Self::Aborted => f.write_str("abort"),
        }
    }
}

impl WorkflowState {
    /// Apply one event, rejecting transitions the workflow does not define
    pub fn advance(self, event: WorkflowEvent) -> Result<Self, InternalError> {
        use WorkflowEvent as E;
        use WorkflowState as S;

        let next = match (self, event) {
            (S::Start, E::Begin) => S::Syncing,
            (S::Syncing, E::Synced(SyncOutcome::Completed)) => S::Completed,
            (S::Syncing, E::Synced(SyncOutcome::NoTable)) => S::NoTable,
            (S::Syncing, E::Synced(SyncOutcome::Failed)) => S::Failed,
            (S::Syncing, E::Synced(SyncOutcome::InitNeeded)) => S::Initializing,
            (S::Initializing, E::Initialized(InitOutcome::Completed)) => S::Completed,
            (S::Initializing, E::Initialized(InitOutcome::Failed)) => S::Failed,
            (state, E::Aborted) if !state.is_terminal() => S::Failed,
            (state, event) => return Err(InternalError::invalid_transition(state, event)),
        };
        Ok(next)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::NoTable | Self::Failed)
    }

    /// Terminal result for terminal states
    pub fn terminal_result(self) -> Option<WorkflowResult> {
        match self {
            Self::Completed => Some(WorkflowResult::Completed),
            Self::NoTable => Some(WorkflowResult::NoTable),
            Self::Failed => Some(WorkflowResult::Failed),
            Self::Start | Self::Syncing | Self::Initializing => None,
        }
    }
}

/// Outcome of a single phase plus the failure message behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport<O> {
    pub outcome: O,
    pub message: Option<String>,
}

/// Terminal report for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowReport {
    pub table: TableName,
    pub sync: SyncOutcome,
    pub init: Option<InitOutcome>,
    pub result: WorkflowResult,
    pub message: Option<String>,
    pub elapsed_ms: u64,
}

impl WorkflowReport {
    /// True when the workflow escalated to initialization
    pub fn escalated(&self) -> bool {
        self.init.is_some()
    }

    /// Report for a table whose task could not be joined
    pub fn unjoined(table: TableName, error: &InternalError) -> Self {
        Self {
            table,
            sync: SyncOutcome::Failed,
            init: None,
            result: WorkflowResult::Failed,
            message: Some(error.to_string()),
            elapsed_ms: 0,
        }
    }
}

/// Progress of a running workflow, readable after a panic or timeout
#[derive(Debug)]
struct Tracker {
    state: WorkflowState,
    sync: Option<SyncOutcome>,
    init: Option<InitOutcome>,
    message: Option<String>,
}

impl Default for Tracker {
    fn default() -> Self {
        Self {
            state: WorkflowState::Start,
            sync: None,
            init: None,
            message: None,
        }
    }
}

/// Runs sync, and init when needed, for one table at a time
pub struct TableWorkflow {
    primitives: Arc<dyn TablePrimitives>,
    session: Arc<RunSession>,
    audit: Arc<dyn AuditSink>,
    deadline: Option<Duration>,
}

impl TableWorkflow {
    pub fn new(
        primitives: Arc<dyn TablePrimitives>,
        session: Arc<RunSession>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            primitives,
            session,
            audit,
            deadline: None,
        }
    }

    /// Bound the whole sync-or-init sequence of each table
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn session(&self) -> &RunSession {
        &self.session
    }

    /// Attempt an incremental sync and classify the result
    ///
    /// Emits one `"<outcome> sync table: <table>"` line.
    pub async fn synchronize_table(&self, table: &TableName) -> PhaseReport<SyncOutcome> {
        debug!("Syncing table {table}");
        let result = self.primitives.sync(&self.session, table).await;
        let outcome = classify_sync(&result);
        let message = result.err().map(|e| e.to_string());

        match outcome {
            SyncOutcome::Failed => {
                let msg = message.as_deref().unwrap_or_default();
                warn!("Sync failed for table {table}: {msg}");
            }
            SyncOutcome::InitNeeded => debug!("Table {table} needs initialization"),
            SyncOutcome::NoTable | SyncOutcome::Completed => {}
        }

        let line_message = (outcome == SyncOutcome::Failed)
            .then(|| message.clone())
            .flatten();
        record_guarded(
            self.audit.as_ref(),
            &StatusLine::sync(table, outcome, line_message),
        );

        PhaseReport { outcome, message }
    }

    /// Run a full initialization. Any failure is `Failed`.
    ///
    /// Emits one `"<outcome> init table: <table>"` line.
    pub async fn initialize_table(&self, table: &TableName) -> PhaseReport<InitOutcome> {
        debug!("Initializing table {table}");
        let result = self.primitives.init(&self.session, table).await;
        let outcome = classify_init(&result);
        let message = result.err().map(|e| e.to_string());

        if let Some(msg) = &message {
            warn!("Init failed for table {table}: {msg}");
        }

        record_guarded(
            self.audit.as_ref(),
            &StatusLine::init(table, outcome, message.clone()),
        );

        PhaseReport { outcome, message }
    }

    /// Sync the table, escalating to init on a missing schema
    ///
    /// Always returns a terminal report.
    pub async fn sync_or_init(&self, table: &TableName) -> WorkflowReport {
        let started = Instant::now();
        let tracker = Mutex::new(Tracker::default());

        let guarded = AssertUnwindSafe(self.drive(table, &tracker)).catch_unwind();
        let outcome = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, guarded).await {
                Ok(caught) => caught,
                Err(_) => Ok(Err(InternalError::timed_out(deadline))),
            },
            None => guarded.await,
        };

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e),
            Err(payload) => Some(InternalError::panicked(payload.as_ref())),
        };

        let mut tracker = tracker
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(error) = failure {
            error!("Table {table} workflow aborted: {error}");
            self.abort(table, &mut tracker, &error);
        }

        let result = tracker
            .state
            .terminal_result()
            .unwrap_or(WorkflowResult::Failed);

        WorkflowReport {
            table: table.clone(),
            sync: tracker.sync.unwrap_or(SyncOutcome::Failed),
            init: tracker.init,
            result,
            message: tracker.message,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    async fn drive(&self, table: &TableName, tracker: &Mutex<Tracker>) -> Result<(), InternalError> {
        transition(tracker, table, WorkflowEvent::Begin)?;

        let sync = self.synchronize_table(table).await;
        record(tracker, |t| {
            t.sync = Some(sync.outcome);
            t.message = sync.message.clone();
        });
        transition(tracker, table, WorkflowEvent::Synced(sync.outcome))?;

        if sync.outcome != SyncOutcome::InitNeeded {
            return Ok(());
        }

        let init = self.initialize_table(table).await;
        record(tracker, |t| {
            t.init = Some(init.outcome);
            t.message = init.message.clone();
        });
        transition(tracker, table, WorkflowEvent::Initialized(init.outcome))?;

        Ok(())
    }

    /// Close out a workflow interrupted mid-phase
    fn abort(&self, table: &TableName, tracker: &mut Tracker, error: &InternalError) {
        let message = Some(error.to_string());

        match tracker.state {
            WorkflowState::Start | WorkflowState::Syncing if tracker.sync.is_none() => {
                tracker.sync = Some(SyncOutcome::Failed);
                record_guarded(
                    self.audit.as_ref(),
                    &StatusLine::sync(table, SyncOutcome::Failed, message.clone()),
                );
            }
            WorkflowState::Initializing if tracker.init.is_none() => {
                tracker.init = Some(InitOutcome::Failed);
                record_guarded(
                    self.audit.as_ref(),
                    &StatusLine::init(table, InitOutcome::Failed, message.clone()),
                );
            }
            // Phase line already written
            _ => {}
        }

        tracker.state = tracker
            .state
            .advance(WorkflowEvent::Aborted)
            .unwrap_or(tracker.state);
        if !tracker.state.is_terminal() {
            tracker.state = WorkflowState::Failed;
        }
        tracker.message = message;
    }
}

fn record(tracker: &Mutex<Tracker>, update: impl FnOnce(&mut Tracker)) {
    let mut guard = tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    update(&mut guard);
}

fn transition(
    tracker: &Mutex<Tracker>,
    table: &TableName,
    event: WorkflowEvent,
) -> Result<(), InternalError> {
    let mut guard = tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let next = guard.state.advance(event)?;
    debug!("Table {table}: {} -> {next} on {event}", guard.state);
    guard.state = next;
    Ok(())
}
