//! Receiver error types.

use thiserror::Error;

use super::lifecycle::ReceiverState;
use crate::config::ConfigError;
use crate::consumer::ConsumerError;

/// Errors surfaced to the host by lifecycle operations.
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// Configuration rejected at start.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `start` called outside the `Created` state.
    #[error("receiver cannot start from state '{0}'")]
    InvalidState(ReceiverState),
}

/// Errors that end a single tick.
///
/// None of these ever reach the host; the scheduler logs them and waits for
/// the next tick.
#[derive(Debug, Error)]
pub enum TickError {
    /// Spawn failure, non-zero exit or timeout.
    #[error("script execution failed: {reason}")]
    ExecutionFailed {
        /// Exit status or spawn/wait error.
        reason: String,
        /// Captured standard error (possibly truncated).
        stderr: String,
    },

    /// Stdout was not a valid metrics document.
    #[error("failed to decode metrics payload: {0}")]
    DecodeFailed(#[from] serde_json::Error),

    /// The document had no resource-metric groups.
    #[error("metrics payload contains no resource metrics")]
    EmptyPayload,

    /// The downstream consumer refused the document.
    #[error("failed to forward metrics: {0}")]
    ForwardFailed(#[from] ConsumerError),
}

impl TickError {
    /// Outcomes that are skipped with a warning instead of an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyPayload)
    }
}
