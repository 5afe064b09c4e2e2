//! In-memory log shared between cloned handles.

use super::{Log, LogError};
use crate::core::{Context, LogRecord};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Log kept in process memory.
///
/// Clones share the same records but each handle has its own open/closed
/// flag, so an engine can close its handle while another engine (or a test)
/// keeps using the same history.
///
/// # Example
///
/// ```rust
/// use statelog::core::LogRecord;
/// use statelog::log::{Log, MemoryLog};
/// use serde_json::json;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let mut log = MemoryLog::new();
/// let reader = log.clone();
///
/// log.append(LogRecord::new("running", json!({ "counter": 1 }))).await.unwrap();
/// log.close().await.unwrap();
///
/// assert_eq!(reader.len(), 1);
/// assert_eq!(reader.get(0).await.unwrap().state, "running");
/// # });
/// ```
#[derive(Debug)]
pub struct MemoryLog<C> {
    records: Arc<RwLock<Vec<LogRecord<C>>>>,
    closed: bool,
}

impl<C: Context> MemoryLog<C> {
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn from_records(records: Vec<LogRecord<C>>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            closed: false,
        }
    }

    /// Copy of every record currently in the log.
    pub fn records(&self) -> Vec<LogRecord<C>> {
        self.read().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // Records are only ever pushed or truncated under the lock, so a panic
    // elsewhere never leaves them half-written.
    fn read(&self) -> RwLockReadGuard<'_, Vec<LogRecord<C>>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<LogRecord<C>>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_open(&self) -> Result<(), LogError> {
        if self.closed {
            Err(LogError::Closed)
        } else {
            Ok(())
        }
    }
}

impl<C> Clone for MemoryLog<C> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            closed: false,
        }
    }
}

impl<C: Context> Default for MemoryLog<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<C: Context> Log<C> for MemoryLog<C> {
    async fn ready(&mut self) -> Result<(), LogError> {
        self.ensure_open()
    }

    fn len(&self) -> usize {
        self.read().len()
    }

    async fn get(&self, index: usize) -> Result<LogRecord<C>, LogError> {
        self.ensure_open()?;
        let records = self.read();
        records
            .get(index)
            .cloned()
            .ok_or(LogError::OutOfRange {
                index,
                length: records.len(),
            })
    }

    async fn append(&mut self, record: LogRecord<C>) -> Result<(), LogError> {
        self.ensure_open()?;
        self.write().push(record);
        Ok(())
    }

    async fn truncate(&mut self, len: usize) -> Result<(), LogError> {
        self.ensure_open()?;
        self.write().truncate(len);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), LogError> {
        self.ensure_open()?;
        self.closed = true;
        Ok(())
    }
}
