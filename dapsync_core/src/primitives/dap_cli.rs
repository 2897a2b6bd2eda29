//! Primitives backed by Instructure's `dap` command-line client
//!
//! Each call spawns `dap syncdb` or `dap initdb` for a single table, or
//! `dap list` for the namespace. Secrets travel through the child's
//! environment, never through its argument list.

use super::TablePrimitives;
use crate::error::PrimitiveError;
use crate::session::RunSession;
use crate::tables::TableName;
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::process::Command;

/// Default executable looked up on `PATH`
pub const DEFAULT_DAP_EXECUTABLE: &str = "dap";

/// DAP subcommand for one primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DapCommand {
    SyncDb,
    InitDb,
    List,
}

impl DapCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SyncDb => "syncdb",
            Self::InitDb => "initdb",
            Self::List => "list",
        }
    }
}

/// Runs the `dap` CLI for sync and init
#[derive(Debug, Clone)]
pub struct DapCliPrimitives {
    executable: PathBuf,
}

impl Default for DapCliPrimitives {
    fn default() -> Self {
        Self::new(DEFAULT_DAP_EXECUTABLE)
    }
}

impl DapCliPrimitives {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Arguments for one invocation, excluding the executable
    pub fn build_args(command: DapCommand, session: &RunSession, table: &TableName) -> Vec<String> {
        vec![
            "--base-url".to_string(),
            session.base_url().to_string(),
            command.as_str().to_string(),
            "--namespace".to_string(),
            session.namespace().to_string(),
            "--table".to_string(),
            table.to_string(),
        ]
    }

    /// Arguments for listing the namespace's tables
    pub fn list_args(session: &RunSession) -> Vec<String> {
        vec![
            "--base-url".to_string(),
            session.base_url().to_string(),
            DapCommand::List.as_str().to_string(),
            "--namespace".to_string(),
            session.namespace().to_string(),
        ]
    }

    async fn spawn(&self, args: &[String], session: &RunSession) -> Result<Output, PrimitiveError> {
        Command::new(&self.executable)
            .args(args)
            .env("DAP_CLIENT_ID", session.credentials().client_id())
            .env(
                "DAP_CLIENT_SECRET",
                session.credentials().client_secret().expose_secret(),
            )
            .env(
                "DAP_CONNECTION_STRING",
                session.connection_string().expose_secret(),
            )
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                PrimitiveError::other(format!(
                    "Failed to launch {}: {e}",
                    self.executable.display()
                ))
            })
    }

    async fn run(
        &self,
        command: DapCommand,
        session: &RunSession,
        table: &TableName,
    ) -> Result<(), PrimitiveError> {
        let args = Self::build_args(command, session, table);
        debug!(
            "Running {} {} for table {table}",
            self.executable.display(),
            command.as_str()
        );

        let output = self.spawn(&args, session).await?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(map_failure(table, &stderr, output.status.code()))
    }
}

#[async_trait]
impl TablePrimitives for DapCliPrimitives {
    async fn sync(&self, session: &RunSession, table: &TableName) -> Result<(), PrimitiveError> {
        self.run(DapCommand::SyncDb, session, table).await
    }

    async fn init(&self, session: &RunSession, table: &TableName) -> Result<(), PrimitiveError> {
        self.run(DapCommand::InitDb, session, table).await
    }

    async fn list_tables(&self, session: &RunSession) -> Result<Vec<String>, PrimitiveError> {
        debug!(
            "Listing tables in namespace '{}' with {}",
            session.namespace(),
            self.executable.display()
        );
        let output = self.spawn(&Self::list_args(session), session).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrimitiveError::other(failure_message(
                &stderr,
                output.status.code(),
            )));
        }

        Ok(parse_table_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// One table name per non-empty line
pub fn parse_table_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Last non-empty stderr line, which is where the client prints the exception
fn failure_message(stderr: &str, exit_code: Option<i32>) -> String {
    stderr
        .lines()
        .map(str::trim)
        .rev()
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| match exit_code {
            Some(code) => format!("dap exited with status {code}"),
            None => "dap terminated by signal".to_string(),
        })
}

/// Translate a failed `dap` run into a [`PrimitiveError`]
///
/// Only the client's own `NonExistingTableError` marks a missing table. A
/// database error such as `relation "x" does not exist` stays generic.
pub fn map_failure(table: &TableName, stderr: &str, exit_code: Option<i32>) -> PrimitiveError {
    let message = failure_message(stderr, exit_code);

    if stderr.contains("NonExistingTableError") {
        PrimitiveError::non_existing_table(table.as_str(), message)
    } else {
        PrimitiveError::other(message)
    }
}
