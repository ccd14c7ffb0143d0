//! State machine trait for lifecycle status enums.

use super::ValidationError;

/// A status enum whose allowed transitions are declared up front.
///
/// Implementors list their outgoing edges; `transition_to` and
/// `is_terminal` are derived from that list.
///
/// ```ignore
/// let next = DecisionStatus::Voting.transition_to(DecisionStatus::Approved)?;
/// assert!(next.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns every status reachable in one step from this one.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if moving from self to target is allowed.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Moves to `target`, or fails if the edge does not exist.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// A status with no outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
