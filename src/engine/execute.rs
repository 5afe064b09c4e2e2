//! The write path: resolve, apply, append, advance, notify.

use super::{Engine, EngineError};
use crate::core::{Context, LogRecord};
use crate::log::Log;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

impl<C: Context, L: Log<C>> Engine<C, L> {
    /// Apply one action and durably record the result.
    ///
    /// Returns the record that was appended. The transition body runs on a
    /// copy of the context, and the live state and context only change once
    /// the append succeeds, so any error leaves the engine as it was. If the
    /// append itself fails the record may or may not be durable; reopen the
    /// engine to find out.
    pub async fn action(&mut self, name: &str, payload: Value) -> Result<LogRecord<C>, EngineError> {
        self.ensure_open()?;

        if let Some(index) = self.cursor {
            let length = self.log.len();
            warn!(action = name, index, length, "action rejected while showing history");
            return Err(EngineError::DetachedCursor { index, length });
        }
        if self.stale {
            let length = self.log.len();
            warn!(action = name, length, "action rejected until the engine is synced");
            return Err(EngineError::NeedsSync { length });
        }

        let definition = Arc::clone(&self.definition);
        let Some(transition) = definition.resolve(self.state.as_str(), name) else {
            debug!(action = name, state = %self.state, "no matching transition");
            return Err(EngineError::InvalidAction {
                action: name.to_string(),
                state: self.state.clone(),
            });
        };

        let mut context = self.context.clone();
        transition.run(&mut context, &payload).await;

        let next = transition
            .target()
            .cloned()
            .unwrap_or_else(|| self.state.clone());
        let record = LogRecord::new(next, context);

        if let Err(error) = self.log.append(record.clone()).await {
            warn!(
                action = name,
                state = %self.state,
                error = %error,
                "append failed; record durability unknown"
            );
            return Err(error.into());
        }

        debug!(
            action = name,
            from = %self.state,
            to = %record.state,
            index = self.log.len().saturating_sub(1),
            "transition committed"
        );
        self.state = record.state.clone();
        let previous = std::mem::replace(&mut self.context, record.context.clone());

        if transition.target().is_some() || self.options.emit_self_loops {
            let track = self.options.previous_context && self.has_subscribers();
            self.emit(track.then_some(previous));
        }
        Ok(record)
    }
}
