//! Checkpoint error types.

use thiserror::Error;

/// Errors raised while encoding, decoding or validating a [`Checkpoint`](super::Checkpoint).
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The checkpoint could not be written in the requested format
    #[error("could not encode checkpoint as {format}: {reason}")]
    Encode { format: &'static str, reason: String },

    /// The input is not a well-formed checkpoint in the given format
    #[error("could not decode {format} checkpoint: {reason}")]
    Decode { format: &'static str, reason: String },

    #[error("checkpoint format version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The recorded cursor points past the end of the recorded log
    #[error("checkpoint cursor {cursor} lies outside a log of length {log_length}")]
    CursorOutOfRange { cursor: usize, log_length: usize },
}
