//! DecisionEngine - participant registry and decision lifecycle.
//!
//! All state sits behind a single `RwLock`. A vote is recorded, evaluated,
//! and (if it decides the outcome) resolved and appended to history inside
//! one write-lock section, so exactly one caller wins each terminal
//! transition. Notifications and approval side effects run after the lock
//! is released.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::adapters::SystemClock;
use crate::config::{EngineConfig, ValidationError as ConfigValidationError};
use crate::domain::decision::{
    Decision, DecisionError, DecisionNotification, DecisionProgress, DecisionStatus,
    DecisionStatusView, EngineMetrics, ExecutionReport, Participant, ParticipantStatus,
    VoteReceipt, VoteRecord, DEFAULT_WEIGHT,
};
use crate::domain::foundation::{
    DecisionId, DomainError, ErrorCode, ParticipantId, Timestamp, ValidationError,
};
use crate::ports::{Clock, DecisionAction, NotificationSink};

use super::commands::{ApprovalHooks, CastVoteCommand, ProposeDecisionCommand};

/// A decision that just reached a terminal status, with what is needed to
/// finish it outside the lock.
struct Transition {
    decision: Decision,
    hooks: Option<ApprovalHooks>,
    recipients: Vec<ParticipantId>,
}

#[derive(Default)]
struct EngineState {
    participants: HashMap<ParticipantId, Participant>,
    decisions: HashMap<DecisionId, Decision>,
    hooks: HashMap<DecisionId, ApprovalHooks>,
    history: Vec<Decision>,
}

impl EngineState {
    /// Weight of every registered participant, voters or not.
    fn total_weight(&self) -> f64 {
        self.participants.values().map(Participant::weight).sum()
    }

    fn participant_ids(&self) -> Vec<ParticipantId> {
        let mut ids: Vec<ParticipantId> = self.participants.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn voting_ids(&self) -> Vec<DecisionId> {
        self.decisions
            .values()
            .filter(|d| d.status().is_open())
            .map(|d| *d.id())
            .collect()
    }

    /// Run the resolution check and, on a terminal outcome, resolve the
    /// decision and append it to history.
    fn settle(&mut self, id: &DecisionId, threshold: f64, now: Timestamp) -> Option<Transition> {
        let total_weight = self.total_weight();
        let decision = self.decisions.get_mut(id)?;
        let outcome = decision.evaluate(total_weight, threshold, &now)?;
        decision.resolve(outcome, now).ok()?;

        let snapshot = decision.clone();
        self.history.push(snapshot.clone());

        let hooks = self
            .hooks
            .remove(id)
            .filter(|_| outcome == DecisionStatus::Approved);

        Some(Transition {
            decision: snapshot,
            hooks,
            recipients: self.participant_ids(),
        })
    }

    fn record_execution(&mut self, id: &DecisionId, report: &ExecutionReport) {
        if let Some(decision) = self.decisions.get_mut(id) {
            decision.record_execution(report);
        }
        if let Some(entry) = self.history.iter_mut().rev().find(|d| d.id() == id) {
            entry.record_execution(report);
        }
    }
}

/// Weighted-voting decision engine.
///
/// Shared through `Arc`; every operation takes `&self`.
///
/// # Example
///
/// ```ignore
/// let engine = DecisionEngine::new(EngineConfig::default(), Arc::new(TracingNotificationSink::new()))?;
/// engine.register_participant(ParticipantId::new("a")?, ["review"], 2.0).await?;
/// let id = engine.propose_decision(ProposeDecisionCommand::new(proposal)).await;
/// engine.cast_vote(CastVoteCommand::new(id, ParticipantId::new("a")?, VoteChoice::Approve)).await?;
/// ```
pub struct DecisionEngine {
    config: EngineConfig,
    state: RwLock<EngineState>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl DecisionEngine {
    /// Build an engine around a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a threshold outside (0, 1] or a zero
    /// consensus timeout or sweep interval.
    pub fn new(
        config: EngineConfig,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, ConfigValidationError> {
        config.validate()?;
        Ok(Self {
            config,
            state: RwLock::new(EngineState::default()),
            notifier,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Participant registry
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a participant, or update one already registered.
    ///
    /// Re-registration replaces capabilities and weight, reactivates the
    /// participant and keeps `registered_at`. Votes already cast keep the
    /// weight they were cast with.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if weight is not a finite number above zero, or
    ///   if it would push the total registered weight out of finite range
    pub async fn register_participant<I, S>(
        &self,
        id: ParticipantId,
        capabilities: I,
        weight: f64,
    ) -> Result<Participant, DecisionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let capabilities: BTreeSet<String> = capabilities.into_iter().map(Into::into).collect();
        let now = self.clock.now();
        let mut state = self.state.write().await;

        let others: f64 = state
            .participants
            .values()
            .filter(|p| p.id() != &id)
            .map(Participant::weight)
            .sum();
        if weight.is_finite() && weight > 0.0 && !(others + weight).is_finite() {
            return Err(ValidationError::invalid_format(
                "weight",
                format!("total registered weight would overflow with {}", weight),
            )
            .into());
        }

        let participant = match state.participants.get_mut(&id) {
            Some(existing) => {
                existing.reregister(capabilities, weight, now)?;
                info!(participant_id = %id, weight, "Participant re-registered");
                existing.clone()
            }
            None => {
                let participant = Participant::new(id.clone(), capabilities, weight, now)?;
                state.participants.insert(id.clone(), participant.clone());
                info!(participant_id = %id, weight, "Participant registered");
                participant
            }
        };

        Ok(participant)
    }

    /// Register with the default weight of 1.
    pub async fn register_participant_default<I, S>(
        &self,
        id: ParticipantId,
        capabilities: I,
    ) -> Result<Participant, DecisionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register_participant(id, capabilities, DEFAULT_WEIGHT)
            .await
    }

    /// Mark a participant active or inactive.
    ///
    /// Inactive participants are not asked to vote on new proposals but
    /// still count toward total weight and may still vote.
    pub async fn set_participant_status(
        &self,
        id: &ParticipantId,
        status: ParticipantStatus,
    ) -> Result<Participant, DecisionError> {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let participant = state
            .participants
            .get_mut(id)
            .ok_or_else(|| DecisionError::participant_not_found(id.clone()))?;

        participant.set_status(status, now);
        debug!(participant_id = %id, ?status, "Participant status changed");
        Ok(participant.clone())
    }

    pub async fn participant(&self, id: &ParticipantId) -> Option<Participant> {
        self.state.read().await.participants.get(id).cloned()
    }

    /// All registered participants, ordered by id.
    pub async fn participants(&self) -> Vec<Participant> {
        let state = self.state.read().await;
        let mut participants: Vec<Participant> = state.participants.values().cloned().collect();
        participants.sort_by(|a, b| a.id().cmp(b.id()));
        participants
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Decision lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Open a decision and notify every eligible participant.
    ///
    /// Notification failures are logged and do not fail the proposal.
    pub async fn propose_decision(&self, cmd: ProposeDecisionCommand) -> DecisionId {
        let ProposeDecisionCommand { proposal, hooks } = cmd;
        let id = DecisionId::new();
        let now = self.clock.now();

        let (notification, recipients) = {
            let mut state = self.state.write().await;
            let decision = Decision::open(id, proposal, now, self.consensus_window());

            let recipients: Vec<ParticipantId> = state
                .participant_ids()
                .into_iter()
                .filter(|pid| {
                    state.participants.get(pid).map_or(false, |p| {
                        p.is_eligible_for(decision.proposal().required_capabilities())
                    })
                })
                .collect();

            info!(
                decision_id = %id,
                title = decision.proposal().title(),
                proposer = %decision.proposal().proposer(),
                eligible = recipients.len(),
                timeout_at = %decision.timeout_at().as_datetime(),
                "Decision proposed"
            );

            let notification = DecisionNotification::proposal(&decision);
            state.decisions.insert(id, decision);
            state.hooks.insert(id, hooks);
            (notification, recipients)
        };

        self.broadcast(&recipients, &notification).await;
        id
    }

    /// Record a vote and resolve the decision if it is now decided.
    ///
    /// The receipt reflects the status right after the vote, including a
    /// terminal status reached by this vote. Approval side effects and
    /// result notifications complete before this returns, but their
    /// failures never surface here.
    ///
    /// # Errors
    ///
    /// - `DecisionNotFound` if the decision does not exist
    /// - `InvalidState` if the decision is no longer voting
    /// - `ParticipantNotFound` if the voter is not registered
    pub async fn cast_vote(&self, cmd: CastVoteCommand) -> Result<VoteReceipt, DecisionError> {
        let CastVoteCommand {
            decision_id,
            participant_id,
            choice,
            reasoning,
        } = cmd;
        let now = self.clock.now();

        let (receipt, transition) = {
            let mut state = self.state.write().await;

            let status = state
                .decisions
                .get(&decision_id)
                .map(Decision::status)
                .ok_or_else(|| DecisionError::decision_not_found(decision_id))?;
            if !status.is_open() {
                return Err(DecisionError::invalid_state(decision_id, status));
            }

            let voter = state
                .participants
                .get_mut(&participant_id)
                .ok_or_else(|| DecisionError::participant_not_found(participant_id.clone()))?;
            voter.touch(now);
            let vote = VoteRecord::new(choice, reasoning, voter.weight(), now);

            if let Some(decision) = state.decisions.get_mut(&decision_id) {
                decision.record_vote(participant_id.clone(), vote)?;
            }
            debug!(
                decision_id = %decision_id,
                participant_id = %participant_id,
                choice = %choice,
                "Vote recorded"
            );

            let transition = state.settle(&decision_id, self.config.voting_threshold, now);

            let registered = state.participants.len();
            let decision = state
                .decisions
                .get(&decision_id)
                .ok_or_else(|| DecisionError::decision_not_found(decision_id))?;
            let receipt = VoteReceipt {
                decision_id,
                status: decision.status(),
                progress: DecisionProgress::new(decision.vote_count(), registered),
                time_remaining: decision.time_remaining(&now),
            };
            (receipt, transition)
        };

        if let Some(transition) = transition {
            self.complete(transition).await;
        }
        Ok(receipt)
    }

    /// Run the resolution check on every voting decision.
    ///
    /// Returns the ids that reached a terminal status on this pass.
    pub async fn resolve_pending(&self) -> Vec<DecisionId> {
        let now = self.clock.now();
        let transitions: Vec<Transition> = {
            let mut state = self.state.write().await;
            state
                .voting_ids()
                .into_iter()
                .filter_map(|id| state.settle(&id, self.config.voting_threshold, now))
                .collect()
        };

        let mut resolved = Vec::with_capacity(transitions.len());
        for transition in transitions {
            resolved.push(*transition.decision.id());
            self.complete(transition).await;
        }
        resolved
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn decision_status(&self, id: &DecisionId) -> Result<DecisionStatusView, DecisionError> {
        let now = self.clock.now();
        let state = self.state.read().await;
        let decision = state
            .decisions
            .get(id)
            .ok_or_else(|| DecisionError::decision_not_found(*id))?;
        Ok(DecisionStatusView::project(decision, state.participants.len(), &now))
    }

    pub async fn metrics(&self) -> EngineMetrics {
        let state = self.state.read().await;
        let active_decisions = state
            .decisions
            .values()
            .filter(|d| d.status().is_open())
            .count();
        EngineMetrics::compute(state.participants.len(), active_decisions, &state.history)
    }

    /// Terminal decisions in the order they resolved.
    pub async fn history(&self) -> Vec<Decision> {
        self.state.read().await.history.clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Side effects
    // ─────────────────────────────────────────────────────────────────────────

    async fn complete(&self, transition: Transition) {
        let Transition {
            mut decision,
            hooks,
            recipients,
        } = transition;

        info!(
            decision_id = %decision.id(),
            status = %decision.status(),
            votes = decision.vote_count(),
            "Decision resolved"
        );

        if let Some(hooks) = hooks {
            let report = self.execute(&decision, &hooks).await;
            decision.record_execution(&report);
            self.state
                .write()
                .await
                .record_execution(decision.id(), &report);
        }

        self.broadcast(&recipients, &DecisionNotification::result(&decision))
            .await;
    }

    async fn execute(&self, decision: &Decision, hooks: &ApprovalHooks) -> ExecutionReport {
        let mut report = ExecutionReport::default();

        if let Some(action) = &hooks.action {
            match self.run_hook(action.as_ref(), decision).await {
                Ok(()) => debug!(decision_id = %decision.id(), action = action.name(), "Approval action completed"),
                Err(err) => {
                    warn!(decision_id = %decision.id(), action = action.name(), error = %err, "Approval action failed");
                    report.action_error = Some(err.to_string());
                }
            }
        }

        for callback in &hooks.callbacks {
            if let Err(err) = self.run_hook(callback.as_ref(), decision).await {
                warn!(decision_id = %decision.id(), callback = callback.name(), error = %err, "Decision callback failed");
                report
                    .callback_errors
                    .push(format!("{}: {}", callback.name(), err));
            }
        }

        report
    }

    /// Run an action or callback, bounded by the configured action timeout.
    async fn run_hook(
        &self,
        hook: &dyn DecisionAction,
        decision: &Decision,
    ) -> Result<(), DomainError> {
        let Some(limit) = self.config.action_timeout() else {
            return hook.execute(decision).await;
        };

        match tokio::time::timeout(limit, hook.execute(decision)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::new(
                ErrorCode::ExecutionTimedOut,
                format!("'{}' timed out after {}ms", hook.name(), limit.as_millis()),
            )),
        }
    }

    async fn broadcast(&self, recipients: &[ParticipantId], notification: &DecisionNotification) {
        let deliveries = recipients.iter().map(|pid| async move {
            (pid, self.notifier.notify(pid, notification).await)
        });

        for (pid, result) in join_all(deliveries).await {
            match result {
                Ok(()) => debug!(
                    participant_id = %pid,
                    decision_id = %notification.decision_id(),
                    event_type = notification.event_type(),
                    "Notification delivered"
                ),
                Err(err) => warn!(
                    participant_id = %pid,
                    decision_id = %notification.decision_id(),
                    event_type = notification.event_type(),
                    error = %err,
                    "Notification failed"
                ),
            }
        }
    }

    fn consensus_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.config.consensus_timeout_ms).unwrap_or(i64::MAX))
    }
}
