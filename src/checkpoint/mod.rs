//! Portable snapshots of an engine's current view.
//!
//! A [`Checkpoint`] captures the state and context an engine is showing,
//! together with where in the log it was taken. It can be written as JSON for
//! readability or as bincode for compactness, and later used to seed a fresh
//! log with [`Engine::restore`](crate::engine::Engine::restore).
//!
//! Binary checkpoints need a context type that does not rely on
//! self-describing formats; `serde_json::Value` contexts should use JSON.

use crate::core::{Context, LogRecord, StateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of an engine.
/// Does NOT include the machine definition (transition bodies are code).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint<C> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// State being shown when the checkpoint was taken
    pub state: StateId,

    /// Context being shown when the checkpoint was taken
    pub context: C,

    /// Number of records in the log at that time
    pub log_length: usize,

    /// Historical index being shown, `None` at the tip
    pub cursor: Option<usize>,
}

impl<C: Context> Checkpoint<C> {
    pub fn new(state: StateId, context: C, log_length: usize, cursor: Option<usize>) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            state,
            context,
            log_length,
            cursor,
        }
    }

    /// Check the version and the cursor bounds.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        if let Some(cursor) = self.cursor {
            if cursor >= self.log_length {
                return Err(CheckpointError::CursorOutOfRange {
                    cursor,
                    log_length: self.log_length,
                });
            }
        }
        Ok(())
    }

    /// The record this checkpoint would contribute to a log.
    pub fn into_record(self) -> LogRecord<C> {
        LogRecord::new(self.state, self.context)
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(|e| CheckpointError::Encode {
            format: "json",
            reason: e.to_string(),
        })
    }

    /// Decode and validate a JSON checkpoint.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json).map_err(|e| CheckpointError::Decode {
            format: "json",
            reason: e.to_string(),
        })?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode {
            format: "bincode",
            reason: e.to_string(),
        })
    }

    /// Decode and validate a binary checkpoint.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes).map_err(|e| CheckpointError::Decode {
            format: "bincode",
            reason: e.to_string(),
        })?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }
}
