//! Demo runner: registers a small swarm, runs two decisions, prints metrics.

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use collective_decision::adapters::TracingNotificationSink;
use collective_decision::application::{
    CastVoteCommand, DecisionEngine, ProposeDecisionCommand, TimeoutSweeper,
};
use collective_decision::config::AppConfig;
use collective_decision::domain::decision::{Decision, Proposal, VoteChoice};
use collective_decision::domain::foundation::{DomainError, ParticipantId};
use collective_decision::logging::init_logging;
use collective_decision::ports::DecisionAction;

/// Logs the approved proposal in place of a real deployment.
struct AnnounceAction;

#[async_trait]
impl DecisionAction for AnnounceAction {
    async fn execute(&self, decision: &Decision) -> Result<(), DomainError> {
        info!(
            decision_id = %decision.id(),
            title = decision.proposal().title(),
            "Executing approved decision"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "announce"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_logging(&config.logging)?;

    let engine = Arc::new(DecisionEngine::new(
        config.engine.clone(),
        Arc::new(TracingNotificationSink::new()),
    )?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = TimeoutSweeper::from_config(engine.clone());
    let sweeper_handle = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    let architect = ParticipantId::new("architect")?;
    let reviewer = ParticipantId::new("reviewer")?;
    let operator = ParticipantId::new("operator")?;

    engine
        .register_participant(architect.clone(), ["planning", "review"], 2.0)
        .await?;
    engine
        .register_participant_default(reviewer.clone(), ["review"])
        .await?;
    engine
        .register_participant_default(operator.clone(), ["operations"])
        .await?;

    let rollout = engine
        .propose_decision(
            ProposeDecisionCommand::new(
                Proposal::new(
                    "Adopt staged rollout",
                    "Ship the new scheduler to 10% of workers first",
                    architect.clone(),
                )
                .with_required_capabilities(["review"]),
            )
            .with_action(Arc::new(AnnounceAction)),
        )
        .await;

    engine
        .cast_vote(
            CastVoteCommand::new(rollout, architect.clone(), VoteChoice::Approve)
                .with_reasoning("Limits blast radius"),
        )
        .await?;
    let receipt = engine
        .cast_vote(CastVoteCommand::new(rollout, reviewer.clone(), VoteChoice::Approve))
        .await?;
    info!(decision_id = %rollout, status = %receipt.status, "Rollout vote finished");

    let freeze = engine
        .propose_decision(ProposeDecisionCommand::new(Proposal::new(
            "Freeze deployments",
            "Pause all deployments until next week",
            operator.clone(),
        )))
        .await;

    engine
        .cast_vote(CastVoteCommand::new(freeze, architect, VoteChoice::Reject))
        .await?;
    let receipt = engine
        .cast_vote(
            CastVoteCommand::new(freeze, operator, VoteChoice::Reject)
                .with_reasoning("No incident justifies a freeze"),
        )
        .await?;
    info!(decision_id = %freeze, status = %receipt.status, "Freeze vote finished");

    let metrics = engine.metrics().await;
    info!(
        participants = metrics.active_participants,
        active = metrics.active_decisions,
        completed = metrics.completed_decisions,
        approval_rate = %metrics.approval_rate,
        avg_decision_ms = metrics.avg_decision_time.as_millis() as u64,
        "Engine metrics"
    );
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    shutdown_tx.send(true)?;
    sweeper_handle.await?;
    Ok(())
}
