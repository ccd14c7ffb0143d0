//! DecisionAction port - Side effects run when a decision is approved.

use async_trait::async_trait;

use crate::domain::decision::Decision;
use crate::domain::foundation::DomainError;

/// A side effect attached to a proposal.
///
/// Used both for the single approval action and for the ordered result
/// callbacks. Each receives the terminal decision snapshot. A failure is
/// recorded on the decision and never changes its approved status.
///
/// # Example
///
/// ```ignore
/// struct ScaleWorkers { pool: Arc<WorkerPool> }
///
/// #[async_trait]
/// impl DecisionAction for ScaleWorkers {
///     async fn execute(&self, decision: &Decision) -> Result<(), DomainError> {
///         self.pool.grow(2).await.map_err(|e| DomainError::execution(e.to_string()))
///     }
///
///     fn name(&self) -> &str {
///         "ScaleWorkers"
///     }
/// }
/// ```
#[async_trait]
pub trait DecisionAction: Send + Sync {
    /// Run the side effect.
    async fn execute(&self, decision: &Decision) -> Result<(), DomainError>;

    /// Name used in logs and in recorded callback failures.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn DecisionAction) {}
}
