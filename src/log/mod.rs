//! The append-only log collaborator.
//!
//! The engine treats the log as the source of truth: every committed
//! transition becomes one [`LogRecord`], and the in-memory state is always
//! recoverable from the last record. Durability, replication and encoding are
//! the log's business; the engine only needs the narrow [`Log`] trait.
//!
//! [`MemoryLog`] is an in-process implementation suitable for tests and for
//! hosts that persist elsewhere.

mod memory;

pub use memory::MemoryLog;

use crate::core::{Context, LogRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a [`Log`] implementation.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("log is closed")]
    Closed,

    #[error("record index {index} out of range (length {length})")]
    OutOfRange { index: usize, length: usize },

    #[error("log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record encoding failed: {0}")]
    Encoding(String),

    #[error("log backend failed: {0}")]
    Backend(String),
}

/// Append-only, index-addressed sequence of records.
///
/// Every async method is a suspension point of the engine. The engine applies
/// no timeout of its own, so implementations that talk to slow backends
/// should enforce one internally.
#[async_trait]
pub trait Log<C: Context>: Send + Sync {
    /// Resolve once the log can serve reads and appends.
    async fn ready(&mut self) -> Result<(), LogError>;

    /// Current number of records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the record at `index`.
    async fn get(&self, index: usize) -> Result<LogRecord<C>, LogError>;

    /// Durably append one record.
    async fn append(&mut self, record: LogRecord<C>) -> Result<(), LogError>;

    /// Discard every record at and after `len`.
    async fn truncate(&mut self, len: usize) -> Result<(), LogError>;

    /// Release the log. No further calls are valid afterwards.
    async fn close(&mut self) -> Result<(), LogError>;
}
