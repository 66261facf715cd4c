//! Error types for the dispatch core.
//!
//! Action-level failures never surface here: the executor converts them into
//! [`ActionOutcome::Error`](crate::executor::ActionOutcome) so a failed
//! lookup cannot crash a running conversation. `EngineError` covers the
//! turn-level failures that do end a turn outright.

use thiserror::Error;

/// Result type for dispatch-core operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can fail an entire conversation turn.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The model transport cut off before signalling completion. Partial
    /// text is discarded, never parsed.
    #[error("model stream ended prematurely: {0}")]
    StreamIncomplete(String),

    /// The model invocation itself failed (connection, auth, bad response).
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// The model kept chaining actions past the per-turn round limit.
    #[error("action loop exceeded {limit} rounds without a final reply")]
    LoopLimitExceeded {
        /// Configured maximum number of action rounds per turn.
        limit: usize,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
