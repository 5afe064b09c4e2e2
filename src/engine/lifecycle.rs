//! Opening, resynchronising, restoring and closing an engine.

use super::{Engine, EngineError};
use crate::checkpoint::Checkpoint;
use crate::core::Context;
use crate::log::Log;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

impl<C: Context, L: Log<C>> Engine<C, L> {
    /// Wait for the log and restore the live state from its last record.
    ///
    /// The last record already reflects every earlier transition, so only the
    /// tip is read. Afterwards the start pseudo-transition runs (see
    /// [`EngineOptions::start_action`](super::EngineOptions::start_action)) and,
    /// in eager mode with a non-empty log, subscribers receive the tip once.
    ///
    /// If reading the tip fails the live state is left as it was.
    pub async fn open(&mut self) -> Result<(), EngineError> {
        self.log.ready().await?;

        let length = self.log.len();
        if length > 0 {
            let record = self.log.get(length - 1).await?;
            self.load(record)?;
        } else {
            self.reset_to_initial();
        }
        self.cursor = None;
        self.open = true;

        self.run_start().await;

        if self.options.eager && length > 0 {
            self.emit(None);
        }
        debug!(state = %self.state, length, "engine opened");
        Ok(())
    }

    async fn run_start(&mut self) {
        let Some(action) = self.options.start_action.clone() else {
            return;
        };
        let definition = Arc::clone(&self.definition);
        let Some(transition) = definition.resolve(self.state.as_str(), &action) else {
            return;
        };

        if self.options.run_start_apply {
            transition.run(&mut self.context, &Value::Null).await;
        }
        if let Some(target) = transition.target() {
            debug!(from = %self.state, to = %target, "resumed through start transition");
            self.state = target.clone();
        }
    }

    /// Reload the tip of the log and return to tracking it.
    ///
    /// Unlike [`open`](Self::open), this neither runs the start transition nor
    /// notifies subscribers. Use it after [`truncate`](Self::truncate) or when
    /// another writer has appended to a shared log.
    pub async fn sync(&mut self) -> Result<(), EngineError> {
        self.ensure_open()?;

        let length = self.log.len();
        if length > 0 {
            let record = self.log.get(length - 1).await?;
            self.load(record)?;
        } else {
            self.reset_to_initial();
        }
        self.cursor = None;
        debug!(state = %self.state, length, "engine synchronised with log tip");
        Ok(())
    }

    /// Seed an empty log with the state captured in `checkpoint`.
    ///
    /// One record is appended, so a later reopen resumes from it. Subscribers
    /// are not notified.
    pub async fn restore(&mut self, checkpoint: Checkpoint<C>) -> Result<(), EngineError> {
        self.ensure_open()?;
        checkpoint.validate()?;

        let length = self.log.len();
        if length > 0 {
            return Err(EngineError::LogNotEmpty { length });
        }
        if !self.definition.contains_state(checkpoint.state.as_str()) {
            return Err(EngineError::UnknownState(checkpoint.state));
        }

        let record = checkpoint.into_record();
        self.log.append(record.clone()).await?;
        self.load(record)?;
        self.cursor = None;
        debug!(state = %self.state, "engine restored from checkpoint");
        Ok(())
    }

    /// Release the log. The engine is consumed.
    pub async fn close(mut self) -> Result<(), EngineError> {
        self.log.close().await?;
        debug!(state = %self.state, "engine closed");
        Ok(())
    }
}
