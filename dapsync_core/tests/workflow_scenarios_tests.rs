//! Table workflow behaviour against scripted primitives

use dapsync_core::{
    InitOutcome, MemoryAuditSink, SyncOutcome, TableWorkflow, WorkflowResult,
};
use dapsync_test_utils::{MockBehavior, MockPrimitives, PanickingAuditSink, table, test_session};
use std::sync::Arc;
use std::time::Duration;

fn workflow(mock: &MockPrimitives, sink: &MemoryAuditSink) -> TableWorkflow {
    TableWorkflow::new(
        Arc::new(mock.clone()),
        Arc::new(test_session()),
        Arc::new(sink.clone()),
    )
}

#[tokio::test]
async fn test_clean_sync_completes() {
    let mock = MockPrimitives::new();
    let sink = MemoryAuditSink::new();

    let report = workflow(&mock, &sink).sync_or_init(&table("users")).await;

    assert_eq!(report.sync, SyncOutcome::Completed);
    assert_eq!(report.init, None);
    assert_eq!(report.result, WorkflowResult::Completed);
    assert_eq!(sink.rendered(), vec!["Completed sync table: users"]);
    assert_eq!(mock.init_calls("users"), 0);
}

#[tokio::test]
async fn test_missing_table_never_initializes() {
    let mock = MockPrimitives::new().expect_sync("courses", MockBehavior::NoTable);
    let sink = MemoryAuditSink::new();

    let report = workflow(&mock, &sink).sync_or_init(&table("courses")).await;

    assert_eq!(report.result, WorkflowResult::NoTable);
    assert_eq!(sink.rendered(), vec!["NoTable sync table: courses"]);
    assert_eq!(mock.sync_calls("courses"), 1);
    assert_eq!(mock.init_calls("courses"), 0);
}

#[tokio::test]
async fn test_not_initialized_escalates_to_successful_init() {
    let mock =
        MockPrimitives::new().expect_sync("enrollments", MockBehavior::NotInitializedMessage);
    let sink = MemoryAuditSink::new();

    let report = workflow(&mock, &sink)
        .sync_or_init(&table("enrollments"))
        .await;

    assert_eq!(report.sync, SyncOutcome::InitNeeded);
    assert_eq!(report.init, Some(InitOutcome::Completed));
    assert_eq!(report.result, WorkflowResult::Completed);
    assert!(report.escalated());
    assert_eq!(mock.init_calls("enrollments"), 1);
    assert_eq!(
        sink.rendered(),
        vec![
            "InitNeeded sync table: enrollments",
            "Completed init table: enrollments",
        ]
    );
}

#[tokio::test]
async fn test_failed_init_is_reported() {
    let mock = MockPrimitives::new()
        .expect_sync("assignments", MockBehavior::NotInitializedMessage)
        .expect_init(
            "assignments",
            MockBehavior::Fail("could not create schema".to_string()),
        );
    let sink = MemoryAuditSink::new();

    let report = workflow(&mock, &sink)
        .sync_or_init(&table("assignments"))
        .await;

    assert_eq!(report.init, Some(InitOutcome::Failed));
    assert_eq!(report.result, WorkflowResult::Failed);
    assert_eq!(report.message.as_deref(), Some("could not create schema"));
    assert_eq!(
        sink.lines_for("assignments").last().map(String::as_str),
        Some("Failed init table: assignments")
    );
}

#[tokio::test]
async fn test_unrelated_sync_error_fails_without_init() {
    let mock = MockPrimitives::new().expect_sync(
        "accounts",
        MockBehavior::Fail("RuntimeError: connection reset".to_string()),
    );
    let sink = MemoryAuditSink::new();

    let report = workflow(&mock, &sink).sync_or_init(&table("accounts")).await;

    assert_eq!(report.sync, SyncOutcome::Failed);
    assert_eq!(report.result, WorkflowResult::Failed);
    assert_eq!(
        report.message.as_deref(),
        Some("RuntimeError: connection reset")
    );
    assert_eq!(sink.rendered(), vec!["Failed sync table: accounts"]);
    assert_eq!(mock.init_calls("accounts"), 0);
}

#[tokio::test]
async fn test_typed_not_initialized_escalates() {
    let mock = MockPrimitives::new().expect_sync("users", MockBehavior::NotInitialized);
    let sink = MemoryAuditSink::new();

    let report = workflow(&mock, &sink).sync_or_init(&table("users")).await;

    assert_eq!(report.sync, SyncOutcome::InitNeeded);
    assert_eq!(mock.init_calls("users"), 1);
}

#[tokio::test]
async fn test_repeated_runs_on_synced_table_are_idempotent() {
    let mock = MockPrimitives::new();
    let sink = MemoryAuditSink::new();
    let wf = workflow(&mock, &sink);

    let first = wf.sync_or_init(&table("users")).await;
    let second = wf.sync_or_init(&table("users")).await;

    assert_eq!(first.result, WorkflowResult::Completed);
    assert_eq!(second.result, WorkflowResult::Completed);
    assert_eq!(mock.sync_calls("users"), 2);
    assert_eq!(mock.init_calls("users"), 0);
}

#[tokio::test]
async fn test_synchronize_table_alone_reports_init_needed() {
    let mock =
        MockPrimitives::new().expect_sync("enrollments", MockBehavior::NotInitializedMessage);
    let sink = MemoryAuditSink::new();

    let phase = workflow(&mock, &sink)
        .synchronize_table(&table("enrollments"))
        .await;

    assert_eq!(phase.outcome, SyncOutcome::InitNeeded);
    // Classification alone never triggers init
    assert_eq!(mock.init_calls("enrollments"), 0);
    assert_eq!(sink.rendered(), vec!["InitNeeded sync table: enrollments"]);
}

#[tokio::test]
async fn test_initialize_table_swallows_any_failure() {
    let mock = MockPrimitives::new().expect_init("users", MockBehavior::NoTable);
    let sink = MemoryAuditSink::new();

    let phase = workflow(&mock, &sink)
        .initialize_table(&table("users"))
        .await;

    assert_eq!(phase.outcome, InitOutcome::Failed);
    assert!(phase.message.is_some());
    assert_eq!(sink.rendered(), vec!["Failed init table: users"]);
}

#[tokio::test]
async fn test_panicking_sync_is_contained() {
    let mock = MockPrimitives::new().expect_sync(
        "submissions",
        MockBehavior::Panic("driver exploded".to_string()),
    );
    let sink = MemoryAuditSink::new();

    let report = workflow(&mock, &sink)
        .sync_or_init(&table("submissions"))
        .await;

    assert_eq!(report.result, WorkflowResult::Failed);
    assert!(report.message.unwrap().contains("driver exploded"));
    assert_eq!(sink.rendered(), vec!["Failed sync table: submissions"]);
}

#[tokio::test]
async fn test_panicking_init_is_contained() {
    let mock = MockPrimitives::new()
        .expect_sync("quizzes", MockBehavior::NotInitialized)
        .expect_init("quizzes", MockBehavior::Panic("oom".to_string()));
    let sink = MemoryAuditSink::new();

    let report = workflow(&mock, &sink).sync_or_init(&table("quizzes")).await;

    assert_eq!(report.sync, SyncOutcome::InitNeeded);
    assert_eq!(report.init, Some(InitOutcome::Failed));
    assert_eq!(report.result, WorkflowResult::Failed);
    assert_eq!(
        sink.rendered(),
        vec![
            "InitNeeded sync table: quizzes",
            "Failed init table: quizzes",
        ]
    );
}

#[tokio::test]
async fn test_deadline_fails_hung_sync() {
    let mock = MockPrimitives::new().expect_sync("wikis", MockBehavior::Hang);
    let sink = MemoryAuditSink::new();
    let wf = workflow(&mock, &sink).with_deadline(Some(Duration::from_millis(50)));

    let report = wf.sync_or_init(&table("wikis")).await;

    assert_eq!(report.result, WorkflowResult::Failed);
    assert!(report.message.unwrap().contains("timed out"));
    assert_eq!(sink.rendered(), vec!["Failed sync table: wikis"]);
}

#[tokio::test]
async fn test_deadline_fails_hung_init() {
    let mock = MockPrimitives::new()
        .expect_sync("wikis", MockBehavior::NotInitializedMessage)
        .expect_init("wikis", MockBehavior::Hang);
    let sink = MemoryAuditSink::new();
    let wf = workflow(&mock, &sink).with_deadline(Some(Duration::from_millis(50)));

    let report = wf.sync_or_init(&table("wikis")).await;

    assert_eq!(report.init, Some(InitOutcome::Failed));
    assert_eq!(report.result, WorkflowResult::Failed);
    assert_eq!(
        sink.rendered(),
        vec!["InitNeeded sync table: wikis", "Failed init table: wikis"]
    );
}

#[tokio::test]
async fn test_broken_audit_sink_does_not_change_outcome() {
    let mock = MockPrimitives::new()
        .expect_sync("enrollments", MockBehavior::NotInitializedMessage);
    let sink = Arc::new(PanickingAuditSink::new());
    let workflow = TableWorkflow::new(Arc::new(mock.clone()), Arc::new(test_session()), sink.clone());

    let report = workflow.sync_or_init(&table("enrollments")).await;

    assert_eq!(report.sync, SyncOutcome::InitNeeded);
    assert_eq!(report.init, Some(InitOutcome::Completed));
    assert_eq!(report.result, WorkflowResult::Completed);
    assert_eq!(mock.init_calls("enrollments"), 1);
    assert_eq!(sink.attempts(), 2);
}

#[tokio::test]
async fn test_broken_audit_sink_with_primitive_panic() {
    let mock = MockPrimitives::new()
        .expect_sync("users", MockBehavior::Panic("primitive exploded".to_string()));
    let sink = Arc::new(PanickingAuditSink::new());
    let workflow = TableWorkflow::new(Arc::new(mock), Arc::new(test_session()), sink.clone());

    let report = workflow.sync_or_init(&table("users")).await;

    assert_eq!(report.result, WorkflowResult::Failed);
    assert_eq!(report.sync, SyncOutcome::Failed);
    assert_eq!(sink.attempts(), 1);
}
