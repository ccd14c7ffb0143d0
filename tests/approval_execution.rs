//! Integration tests for approval side effects.
//!
//! Covers the action and callbacks attached to a proposal:
//! - they run only on approval, exactly once
//! - failures are recorded on the decision and never undo the approval
//! - a slow action or callback is cut off by the configured action timeout
//! - racing deciding votes trigger a single execution

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use collective_decision::adapters::{InMemoryNotificationSink, ManualClock};
use collective_decision::application::{CastVoteCommand, DecisionEngine, ProposeDecisionCommand};
use collective_decision::config::EngineConfig;
use collective_decision::domain::decision::{
    Decision, DecisionError, DecisionStatus, Proposal, VoteChoice,
};
use collective_decision::domain::foundation::{DecisionId, DomainError, ParticipantId};
use collective_decision::ports::DecisionAction;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Shared log of which hooks ran, in order.
type RunLog = Arc<Mutex<Vec<String>>>;

struct RecordingAction {
    name: String,
    log: RunLog,
    calls: AtomicUsize,
    fail_with: Option<String>,
    delay: Option<Duration>,
}

impl RecordingAction {
    fn build(name: &str, log: &RunLog, fail_with: Option<&str>, delay: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            log: log.clone(),
            calls: AtomicUsize::new(0),
            fail_with: fail_with.map(str::to_string),
            delay,
        })
    }

    fn ok(name: &str, log: &RunLog) -> Arc<Self> {
        Self::build(name, log, None, None)
    }

    fn failing(name: &str, log: &RunLog, message: &str) -> Arc<Self> {
        Self::build(name, log, Some(message), None)
    }

    fn slow(name: &str, log: &RunLog, delay: Duration) -> Arc<Self> {
        Self::build(name, log, None, Some(delay))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecisionAction for RecordingAction {
    async fn execute(&self, decision: &Decision) -> Result<(), DomainError> {
        assert_eq!(decision.status(), DecisionStatus::Approved);
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.lock().unwrap().push(self.name.clone());
        match &self.fail_with {
            Some(message) => Err(DomainError::execution(message.clone())),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn pid(s: &str) -> ParticipantId {
    ParticipantId::new(s).unwrap()
}

fn command() -> ProposeDecisionCommand {
    ProposeDecisionCommand::new(Proposal::new(
        "Scale workers",
        "Add two workers to the pool",
        pid("planner"),
    ))
}

/// Engine with participants a and b (weight 1) and a 0.5 threshold, so a
/// single approve decides.
async fn two_voter_engine(config: EngineConfig) -> Arc<DecisionEngine> {
    let engine = DecisionEngine::new(
        config.with_voting_threshold(0.5),
        Arc::new(InMemoryNotificationSink::new()),
    )
    .unwrap()
    .with_clock(Arc::new(ManualClock::starting_at(0)));
    for name in ["a", "b"] {
        engine
            .register_participant_default(pid(name), Vec::<String>::new())
            .await
            .unwrap();
    }
    Arc::new(engine)
}

async fn decide(engine: &DecisionEngine, id: DecisionId, choice: VoteChoice) -> DecisionStatus {
    engine
        .cast_vote(CastVoteCommand::new(id, pid("a"), choice))
        .await
        .unwrap()
        .status
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn approval_runs_action_then_callbacks_in_order() {
    let log = RunLog::default();
    let action = RecordingAction::ok("deploy", &log);
    let first = RecordingAction::ok("notify-ops", &log);
    let second = RecordingAction::ok("update-board", &log);
    let engine = two_voter_engine(EngineConfig::default()).await;

    let id = engine
        .propose_decision(
            command()
                .with_callback(first.clone())
                .with_action(action.clone())
                .with_callback(second.clone()),
        )
        .await;
    assert_eq!(decide(&engine, id, VoteChoice::Approve).await, DecisionStatus::Approved);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["deploy", "notify-ops", "update-board"]
    );
    let view = engine.decision_status(&id).await.unwrap();
    assert_eq!(view.execution_error, None);
    assert!(view.callback_errors.is_empty());
}

#[tokio::test]
async fn rejection_and_timeout_skip_side_effects() {
    let log = RunLog::default();
    let engine = two_voter_engine(EngineConfig::default()).await;

    let rejected = engine
        .propose_decision(command().with_action(RecordingAction::ok("deploy", &log)))
        .await;
    assert_eq!(decide(&engine, rejected, VoteChoice::Reject).await, DecisionStatus::Rejected);

    let clock = Arc::new(ManualClock::starting_at(0));
    let engine = DecisionEngine::new(EngineConfig::default(), Arc::new(InMemoryNotificationSink::new()))
        .unwrap()
        .with_clock(clock.clone());
    let expired = engine
        .propose_decision(command().with_callback(RecordingAction::ok("report", &log)))
        .await;
    clock.advance_millis(30_001);
    assert_eq!(engine.resolve_pending().await, vec![expired]);

    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failing_action_keeps_approval_and_records_error() {
    let log = RunLog::default();
    let engine = two_voter_engine(EngineConfig::default()).await;
    let id = engine
        .propose_decision(
            command()
                .with_action(RecordingAction::failing("deploy", &log, "cluster unreachable"))
                .with_callback(RecordingAction::ok("report", &log)),
        )
        .await;

    assert_eq!(decide(&engine, id, VoteChoice::Approve).await, DecisionStatus::Approved);

    let view = engine.decision_status(&id).await.unwrap();
    assert_eq!(view.status, DecisionStatus::Approved);
    assert_eq!(
        view.execution_error.as_deref(),
        Some("[EXECUTION_FAILED] cluster unreachable")
    );
    // Callbacks still run after a failed action.
    assert_eq!(*log.lock().unwrap(), vec!["deploy", "report"]);

    let history = engine.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(
        history[0].execution_error(),
        Some("[EXECUTION_FAILED] cluster unreachable")
    );
}

#[tokio::test]
async fn failing_callback_does_not_stop_the_rest() {
    let log = RunLog::default();
    let engine = two_voter_engine(EngineConfig::default()).await;
    let id = engine
        .propose_decision(
            command()
                .with_callback(RecordingAction::failing("audit", &log, "disk full"))
                .with_callback(RecordingAction::ok("report", &log)),
        )
        .await;

    decide(&engine, id, VoteChoice::Approve).await;

    assert_eq!(*log.lock().unwrap(), vec!["audit", "report"]);
    let view = engine.decision_status(&id).await.unwrap();
    assert_eq!(view.execution_error, None);
    assert_eq!(
        view.callback_errors,
        vec!["audit: [EXECUTION_FAILED] disk full".to_string()]
    );
    assert_eq!(engine.history().await[0].callback_errors(), view.callback_errors.as_slice());
}

#[tokio::test]
async fn slow_action_is_cut_off_by_action_timeout() {
    let log = RunLog::default();
    let config = EngineConfig::default().with_action_timeout(Duration::from_millis(20));
    let engine = two_voter_engine(config).await;
    let slow = RecordingAction::slow("migrate", &log, Duration::from_secs(5));
    let id = engine
        .propose_decision(command().with_action(slow.clone()))
        .await;

    assert_eq!(decide(&engine, id, VoteChoice::Approve).await, DecisionStatus::Approved);

    assert_eq!(slow.calls(), 1);
    assert!(log.lock().unwrap().is_empty());
    let view = engine.decision_status(&id).await.unwrap();
    let error = view.execution_error.unwrap();
    assert!(error.starts_with("[EXECUTION_TIMED_OUT]"), "got {}", error);
    assert!(error.contains("migrate"));
}

#[tokio::test]
async fn slow_callback_is_cut_off_and_later_callbacks_still_run() {
    let log = RunLog::default();
    let config = EngineConfig::default().with_action_timeout(Duration::from_millis(20));
    let engine = two_voter_engine(config).await;
    let stalled = RecordingAction::slow("webhook", &log, Duration::from_secs(5));
    let id = engine
        .propose_decision(
            command()
                .with_callback(stalled.clone())
                .with_callback(RecordingAction::ok("report", &log)),
        )
        .await;

    assert_eq!(decide(&engine, id, VoteChoice::Approve).await, DecisionStatus::Approved);

    assert_eq!(stalled.calls(), 1);
    assert_eq!(*log.lock().unwrap(), vec!["report"]);
    let view = engine.decision_status(&id).await.unwrap();
    assert_eq!(view.execution_error, None);
    assert_eq!(view.callback_errors.len(), 1);
    assert!(
        view.callback_errors[0].starts_with("webhook: [EXECUTION_TIMED_OUT]"),
        "got {}",
        view.callback_errors[0]
    );
}

#[tokio::test]
async fn disabled_action_timeout_waits_for_completion() {
    let log = RunLog::default();
    let config = EngineConfig::default().with_action_timeout(Duration::ZERO);
    let engine = two_voter_engine(config).await;
    let id = engine
        .propose_decision(
            command().with_action(RecordingAction::slow("migrate", &log, Duration::from_millis(30))),
        )
        .await;

    decide(&engine, id, VoteChoice::Approve).await;

    assert_eq!(*log.lock().unwrap(), vec!["migrate"]);
    assert_eq!(engine.decision_status(&id).await.unwrap().execution_error, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_deciding_votes_execute_once() {
    let log = RunLog::default();
    let action = RecordingAction::ok("deploy", &log);
    let engine = Arc::new(
        DecisionEngine::new(
            EngineConfig::default().with_voting_threshold(0.6),
            Arc::new(InMemoryNotificationSink::new()),
        )
        .unwrap()
        .with_clock(Arc::new(ManualClock::starting_at(0))),
    );
    let voters = ["a", "b", "c", "d", "e"];
    for name in voters {
        engine
            .register_participant_default(pid(name), Vec::<String>::new())
            .await
            .unwrap();
    }
    let id = engine
        .propose_decision(command().with_action(action.clone()))
        .await;

    // 2 / 5 approve; any one of the next three votes decides.
    for name in ["a", "b"] {
        engine
            .cast_vote(CastVoteCommand::new(id, pid(name), VoteChoice::Approve))
            .await
            .unwrap();
    }

    let handles: Vec<_> = ["c", "d", "e"]
        .into_iter()
        .map(|name| {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .cast_vote(CastVoteCommand::new(id, pid(name), VoteChoice::Approve))
                    .await
            })
        })
        .collect();

    let mut approved = 0;
    let mut closed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(receipt) => {
                assert_eq!(receipt.status, DecisionStatus::Approved);
                approved += 1;
            }
            Err(DecisionError::InvalidState { status, .. }) => {
                assert_eq!(status, DecisionStatus::Approved);
                closed += 1;
            }
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(approved, 1);
    assert_eq!(closed, 2);
    assert_eq!(action.calls(), 1);
    assert_eq!(engine.history().await.len(), 1);
    assert_eq!(engine.decision_status(&id).await.unwrap().votes.len(), 3);
}
