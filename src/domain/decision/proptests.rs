//! Property-based tests for decision resolution.
//!
//! Tests for:
//! - Threshold correctness: approved iff approve weight / total >= threshold
//! - Tie-break: approval wins when both sides cross
//! - Deadline: timeout only when neither side crosses and the deadline passed

use super::{Decision, DecisionStatus, Proposal, VoteChoice, VoteRecord};
use crate::domain::foundation::{DecisionId, ParticipantId, Timestamp};
use chrono::Duration;
use proptest::prelude::*;

fn choice_strategy() -> impl Strategy<Value = VoteChoice> {
    prop_oneof![
        Just(VoteChoice::Approve),
        Just(VoteChoice::Reject),
        Just(VoteChoice::Abstain),
    ]
}

/// Registered weights, each paired with an optional vote.
fn electorate() -> impl Strategy<Value = Vec<(f64, Option<VoteChoice>)>> {
    prop::collection::vec((0.1f64..10.0, prop::option::of(choice_strategy())), 1..12)
}

fn decision_with(electorate: &[(f64, Option<VoteChoice>)]) -> (Decision, f64) {
    let mut decision = Decision::open(
        DecisionId::new(),
        Proposal::new("p", "d", ParticipantId::new("proposer").unwrap()),
        Timestamp::from_unix_millis(0),
        Duration::milliseconds(1_000),
    );
    for (idx, (weight, choice)) in electorate.iter().enumerate() {
        if let Some(choice) = choice {
            let id = ParticipantId::new(format!("agent-{:02}", idx)).unwrap();
            let vote = VoteRecord::new(*choice, "", *weight, Timestamp::from_unix_millis(1));
            decision.record_vote(id, vote).unwrap();
        }
    }
    let total = electorate.iter().map(|(w, _)| w).sum();
    (decision, total)
}

fn side_weight(electorate: &[(f64, Option<VoteChoice>)], side: VoteChoice) -> f64 {
    electorate
        .iter()
        .filter(|(_, c)| *c == Some(side))
        .map(|(w, _)| w)
        .sum()
}

proptest! {
    /// Property: approved exactly when the approve ratio meets the threshold
    #[test]
    fn approval_matches_weight_ratio(
        voters in electorate(),
        threshold in 0.05f64..1.0,
    ) {
        let (decision, total) = decision_with(&voters);
        let before_deadline = Timestamp::from_unix_millis(500);
        let outcome = decision.evaluate(total, threshold, &before_deadline);

        let approve_ratio = side_weight(&voters, VoteChoice::Approve) / total;
        prop_assert_eq!(
            outcome == Some(DecisionStatus::Approved),
            approve_ratio >= threshold
        );
    }

    /// Property: rejection requires the reject ratio to cross and approval not to
    #[test]
    fn rejection_only_when_approval_misses(
        voters in electorate(),
        threshold in 0.05f64..1.0,
    ) {
        let (decision, total) = decision_with(&voters);
        let before_deadline = Timestamp::from_unix_millis(500);
        let outcome = decision.evaluate(total, threshold, &before_deadline);

        let approve_ratio = side_weight(&voters, VoteChoice::Approve) / total;
        let reject_ratio = side_weight(&voters, VoteChoice::Reject) / total;
        prop_assert_eq!(
            outcome == Some(DecisionStatus::Rejected),
            approve_ratio < threshold && reject_ratio >= threshold
        );
    }

    /// Property: past the deadline the decision is always terminal
    #[test]
    fn expired_decision_always_resolves(
        voters in electorate(),
        threshold in 0.05f64..1.0,
    ) {
        let (decision, total) = decision_with(&voters);
        let after_deadline = Timestamp::from_unix_millis(1_001);
        let outcome = decision.evaluate(total, threshold, &after_deadline);
        prop_assert!(outcome.is_some());

        let approve_ratio = side_weight(&voters, VoteChoice::Approve) / total;
        let reject_ratio = side_weight(&voters, VoteChoice::Reject) / total;
        if approve_ratio < threshold && reject_ratio < threshold {
            prop_assert_eq!(outcome, Some(DecisionStatus::Timeout));
        }
    }
}
