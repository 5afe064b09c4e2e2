//! Runtime errors raised by the engine and its stream adapter.

use crate::checkpoint::CheckpointError;
use crate::core::StateId;
use crate::log::LogError;
use thiserror::Error;

/// Errors that can occur while driving an engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// No transition matches the action in the current state. The engine is
    /// unchanged and the caller may try another action.
    #[error("action '{action}' is not available in state '{state}'")]
    InvalidAction { action: String, state: StateId },

    /// The log rejected an operation. Passed through untouched; no retry.
    #[error(transparent)]
    Log(#[from] LogError),

    #[error("engine is not open. Call .open() before driving it")]
    NotOpen,

    #[error("engine is showing record {index} of {length}; truncate or sync before acting")]
    DetachedCursor { index: usize, length: usize },

    /// The record the engine was showing no longer exists in the log.
    #[error("log was truncated to {length} record(s) under the loaded state; call .sync() before acting")]
    NeedsSync { length: usize },

    #[error("cannot restore into a log that already holds {length} record(s)")]
    LogNotEmpty { length: usize },

    #[error("state '{0}' is not declared in the machine definition")]
    UnknownState(StateId),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("machine stream has stopped accepting actions")]
    StreamClosed,

    #[error("machine stream worker failed: {0}")]
    Worker(String),
}

impl EngineError {
    /// Whether the engine is known to be unchanged by the failed call.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidAction { .. }
                | Self::NotOpen
                | Self::DetachedCursor { .. }
                | Self::NeedsSync { .. }
        )
    }
}
