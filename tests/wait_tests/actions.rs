//! Stories about waiting on remote actions

use std::time::Duration;

use cloudwait::{
    wait_for_action, wait_for_action_id, wait_for_actions, ActionStatus, Error, FetchError,
    WaitSpec,
};

use super::common::{action, Script, ScriptedActions};

fn spec() -> WaitSpec {
    WaitSpec::new(Duration::from_secs(1), Duration::from_secs(120))
}

// =============================================================================
// Story: A single action runs to a terminal state
// =============================================================================

/// ["in-progress", "completed"] succeeds after exactly two fetches
#[tokio::test(start_paused = true)]
async fn story_action_completes_after_two_fetches() {
    let script = Script::new(vec![
        Ok(action(36804636, "in-progress")),
        Ok(action(36804636, "completed")),
    ]);

    let done = wait_for_action(&spec(), || script.fetch()).await.unwrap();

    assert_eq!(done.status, ActionStatus::Completed);
    assert_eq!(script.calls(), 2);
}

/// ["in-progress", "errored"] fails after exactly two fetches
#[tokio::test(start_paused = true)]
async fn story_errored_action_stops_the_wait() {
    let script = Script::new(vec![
        Ok(action(36804636, "in-progress")),
        Ok(action(36804636, "errored")),
        Ok(action(36804636, "completed")),
    ]);

    let err = wait_for_action(&spec(), || script.fetch()).await.unwrap_err();

    assert!(matches!(err.error(), Error::ActionErrored { id: 36804636 }));
    assert_eq!(script.calls(), 2);
}

/// Unknown pending statuses keep the wait alive
#[tokio::test(start_paused = true)]
async fn story_new_and_in_progress_are_both_pending() {
    let source = ScriptedActions::default().with(7, &["new", "in-progress", "completed"]);

    let done = wait_for_action_id(&spec(), &source, 7).await.unwrap();

    assert_eq!(done.id, 7);
    assert_eq!(source.calls_for(7), 3);
}

/// Actions do not vanish benignly
#[tokio::test(start_paused = true)]
async fn story_missing_action_is_an_error() {
    let source = ScriptedActions::default();

    let err = wait_for_action_id(&spec(), &source, 404).await.unwrap_err();

    assert!(err.error().is_not_found());
    assert!(err.last_observed().is_none());
}

/// Any other remote failure ends the wait immediately
#[tokio::test(start_paused = true)]
async fn story_remote_failure_is_not_retried() {
    let script = Script::new(vec![Err(FetchError::transport("connection refused"))]);

    let err = wait_for_action(&spec(), || script.fetch()).await.unwrap_err();

    assert!(matches!(err.error(), Error::Fetch { .. }));
    assert_eq!(script.calls(), 1);
}

// =============================================================================
// Story: Batches of actions
// =============================================================================

/// Both completing returns results in input order
#[tokio::test(start_paused = true)]
async fn story_batch_results_follow_input_order() {
    let source = ScriptedActions::default()
        .with(10, &["in-progress", "in-progress", "completed"])
        .with(11, &["completed"]);

    let actions = wait_for_actions(&spec(), &source, &[10, 11]).await.unwrap();

    let ids: Vec<_> = actions.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![10, 11]);
    assert_eq!(source.fetch_order(), vec![10, 11]);
}

/// The first failure aborts the batch; later IDs are never fetched
#[tokio::test(start_paused = true)]
async fn story_batch_short_circuits_on_first_failure() {
    let source = ScriptedActions::default()
        .with(10, &["completed"])
        .with(11, &["in-progress", "errored"])
        .with(12, &["completed"]);

    let err = wait_for_actions(&spec(), &source, &[10, 11, 12])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ActionErrored { id: 11 }));
    assert_eq!(source.calls_for(12), 0);
    assert_eq!(source.fetch_order(), vec![10, 11]);
}
