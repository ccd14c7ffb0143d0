//! Votes and weighted tallies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

/// A participant's position on a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Approve,
    Reject,
    Abstain,
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VoteChoice::Approve => "approve",
            VoteChoice::Reject => "reject",
            VoteChoice::Abstain => "abstain",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for VoteChoice {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(VoteChoice::Approve),
            "reject" => Ok(VoteChoice::Reject),
            "abstain" => Ok(VoteChoice::Abstain),
            other => Err(ValidationError::invalid_format(
                "choice",
                format!("expected approve, reject or abstain, got '{}'", other),
            )),
        }
    }
}

/// A single cast vote.
///
/// `weight` is copied from the participant when the vote is cast and never
/// follows later registry changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub choice: VoteChoice,
    pub reasoning: String,
    pub cast_at: Timestamp,
    pub weight: f64,
}

impl VoteRecord {
    pub fn new(choice: VoteChoice, reasoning: impl Into<String>, weight: f64, cast_at: Timestamp) -> Self {
        Self {
            choice,
            reasoning: reasoning.into(),
            cast_at,
            weight,
        }
    }
}

/// Summed vote weight per choice.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoteTally {
    pub approve: f64,
    pub reject: f64,
    pub abstain: f64,
}

impl VoteTally {
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a VoteRecord>) -> Self {
        votes.into_iter().fold(Self::default(), |mut tally, vote| {
            match vote.choice {
                VoteChoice::Approve => tally.approve += vote.weight,
                VoteChoice::Reject => tally.reject += vote.weight,
                VoteChoice::Abstain => tally.abstain += vote.weight,
            }
            tally
        })
    }

    /// Approve weight over `total_weight`; zero when the total is not positive.
    pub fn approve_ratio(&self, total_weight: f64) -> f64 {
        ratio(self.approve, total_weight)
    }

    /// Reject weight over `total_weight`; zero when the total is not positive.
    pub fn reject_ratio(&self, total_weight: f64) -> f64 {
        ratio(self.reject, total_weight)
    }
}

fn ratio(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(choice: VoteChoice, weight: f64) -> VoteRecord {
        VoteRecord::new(choice, "", weight, Timestamp::now())
    }

    #[test]
    fn parses_choices_case_insensitively() {
        assert_eq!("approve".parse::<VoteChoice>().unwrap(), VoteChoice::Approve);
        assert_eq!(" Reject ".parse::<VoteChoice>().unwrap(), VoteChoice::Reject);
        assert_eq!("ABSTAIN".parse::<VoteChoice>().unwrap(), VoteChoice::Abstain);
        assert!("maybe".parse::<VoteChoice>().is_err());
    }

    #[test]
    fn tally_sums_weight_per_choice() {
        let votes = vec![
            vote(VoteChoice::Approve, 2.0),
            vote(VoteChoice::Reject, 1.0),
            vote(VoteChoice::Approve, 0.5),
            vote(VoteChoice::Abstain, 3.0),
        ];
        let tally = VoteTally::from_votes(&votes);
        assert_eq!(tally.approve, 2.5);
        assert_eq!(tally.reject, 1.0);
        assert_eq!(tally.abstain, 3.0);
    }

    #[test]
    fn abstentions_only_affect_the_denominator() {
        let votes = vec![vote(VoteChoice::Approve, 1.0), vote(VoteChoice::Abstain, 1.0)];
        let tally = VoteTally::from_votes(&votes);
        assert_eq!(tally.approve_ratio(4.0), 0.25);
        assert_eq!(tally.reject_ratio(4.0), 0.0);
    }

    #[test]
    fn zero_total_weight_yields_zero_ratios() {
        let tally = VoteTally::from_votes(&[vote(VoteChoice::Approve, 1.0)]);
        assert_eq!(tally.approve_ratio(0.0), 0.0);
    }

    #[test]
    fn vote_record_serializes_choice_in_snake_case() {
        let json = serde_json::to_value(vote(VoteChoice::Abstain, 1.0)).unwrap();
        assert_eq!(json["choice"], "abstain");
    }
}
