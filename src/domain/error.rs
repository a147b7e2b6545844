//! Trigger engine error types.

use thiserror::Error;

use super::trade::Security;

/// Errors raised by listeners and the threshold strategy.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Construction-time contract violation (bad quantity, trigger, or security).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The execution port failed to place the buy. The listener stays pending.
    #[error("buy execution failed for {security}")]
    ExecutionFailure {
        /// Security the buy was attempted for.
        security: Security,
        /// Error reported by the execution port.
        #[source]
        source: anyhow::Error,
    },

    /// No buy threshold is stored for the security being armed.
    #[error("no buy threshold set for {0}")]
    NoBuyThreshold(Security),

    /// A pending listener already exists for the security.
    #[error("a pending buy is already armed for {0}")]
    AlreadyArmed(Security),
}

impl TriggerError {
    /// True when the error came from the execution port.
    pub const fn is_execution_failure(&self) -> bool {
        matches!(self, Self::ExecutionFailure { .. })
    }
}
