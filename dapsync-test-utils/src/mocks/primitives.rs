//! Mock implementation of TablePrimitives for testing

use async_trait::async_trait;
use dapsync_core::error::PrimitiveError;
use dapsync_core::{RunSession, TableName, TablePrimitives};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a mocked sync or init call does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    Succeed,
    /// `PrimitiveError::NonExistingTable`
    NoTable,
    /// Typed `PrimitiveError::NotInitialized`
    NotInitialized,
    /// Generic error carrying the not-initialized message
    NotInitializedMessage,
    /// Generic error with the given message
    Fail(String),
    Panic(String),
    /// Never completes
    Hang,
}

/// Mock implementation of [`TablePrimitives`]
///
/// Behaviour is configured per table and per primitive; tables without an
/// expectation succeed. Every call is counted and the peak number of
/// concurrent calls is tracked.
///
/// # Examples
///
/// ```rust,no_run
/// use dapsync_test_utils::{MockBehavior, MockPrimitives};
///
/// let mock = MockPrimitives::new()
///     .expect_sync("courses", MockBehavior::NoTable)
///     .expect_sync("enrollments", MockBehavior::NotInitializedMessage);
/// assert_eq!(mock.sync_calls("courses"), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockPrimitives {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    sync_behaviors: HashMap<String, MockBehavior>,
    init_behaviors: HashMap<String, MockBehavior>,
    delay: Duration,
    sync_calls: HashMap<String, usize>,
    init_calls: HashMap<String, usize>,
    in_flight: usize,
    max_in_flight: usize,
    listed_tables: Vec<String>,
    list_failure: Option<String>,
}

#[derive(Clone, Copy)]
enum Call {
    Sync,
    Init,
}

/// Decrements the in-flight counter even when the call is cancelled
struct InFlight {
    state: Arc<Mutex<MockState>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.in_flight = state.in_flight.saturating_sub(1);
        }
    }
}

impl MockPrimitives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every call
    pub fn with_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().delay = delay;
        self
    }

    pub fn expect_sync(self, table: &str, behavior: MockBehavior) -> Self {
        self.state
            .lock()
            .unwrap()
            .sync_behaviors
            .insert(table.to_string(), behavior);
        self
    }

    pub fn expect_init(self, table: &str, behavior: MockBehavior) -> Self {
        self.state
            .lock()
            .unwrap()
            .init_behaviors
            .insert(table.to_string(), behavior);
        self
    }

    /// Tables returned by `list_tables`
    pub fn with_listed_tables(self, tables: &[&str]) -> Self {
        self.state.lock().unwrap().listed_tables = tables.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Make `list_tables` fail with `message`
    pub fn fail_listing(self, message: &str) -> Self {
        self.state.lock().unwrap().list_failure = Some(message.to_string());
        self
    }

    pub fn sync_calls(&self, table: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.sync_calls.get(table).copied().unwrap_or(0)
    }

    pub fn init_calls(&self, table: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.init_calls.get(table).copied().unwrap_or(0)
    }

    pub fn total_init_calls(&self) -> usize {
        self.state.lock().unwrap().init_calls.values().sum()
    }

    /// Peak number of calls observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    async fn call(&self, call: Call, table: &TableName) -> Result<(), PrimitiveError> {
        let (behavior, delay) = {
            let mut state = self.state.lock().unwrap();
            let key = table.to_string();
            let behaviors = match call {
                Call::Sync => &state.sync_behaviors,
                Call::Init => &state.init_behaviors,
            };
            let behavior = behaviors
                .get(&key)
                .cloned()
                .unwrap_or(MockBehavior::Succeed);

            let counter = match call {
                Call::Sync => state.sync_calls.entry(key).or_insert(0),
                Call::Init => state.init_calls.entry(key).or_insert(0),
            };
            *counter += 1;

            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            (behavior, state.delay)
        };
        let _guard = InFlight {
            state: self.state.clone(),
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match behavior {
            MockBehavior::Succeed => Ok(()),
            MockBehavior::NoTable => Err(PrimitiveError::non_existing_table(
                table.as_str(),
                format!("table {table} does not exist"),
            )),
            MockBehavior::NotInitialized => Err(PrimitiveError::not_initialized(table.as_str())),
            MockBehavior::NotInitializedMessage => {
                Err(PrimitiveError::other("ValueError: table not initialized"))
            }
            MockBehavior::Fail(message) => Err(PrimitiveError::other(message)),
            MockBehavior::Panic(message) => panic!("{message}"),
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl TablePrimitives for MockPrimitives {
    async fn sync(&self, _session: &RunSession, table: &TableName) -> Result<(), PrimitiveError> {
        self.call(Call::Sync, table).await
    }

    async fn init(&self, _session: &RunSession, table: &TableName) -> Result<(), PrimitiveError> {
        self.call(Call::Init, table).await
    }

    async fn list_tables(&self, _session: &RunSession) -> Result<Vec<String>, PrimitiveError> {
        let state = self.state.lock().unwrap();
        match &state.list_failure {
            Some(message) => Err(PrimitiveError::other(message.clone())),
            None => Ok(state.listed_tables.clone()),
        }
    }
}
