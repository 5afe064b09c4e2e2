//! The execution engine.
//!
//! An [`Engine`] binds one [`MachineDefinition`] to one [`Log`] and keeps the
//! live `{state, context}` pair in memory. Its operations are split by concern:
//!
//! - `execute`: [`Engine::action`], the event-sourcing write path
//! - `lifecycle`: [`Engine::open`], [`Engine::close`], [`Engine::sync`], [`Engine::restore`]
//! - `cursor`: [`Engine::forward`], [`Engine::backward`], [`Engine::truncate`]
//!
//! Every operation takes `&mut self`, so a single engine can never run two
//! operations at once. Suspension points are exactly the awaited log calls
//! and asynchronous transition bodies; none of them is cancellable and the
//! engine applies no timeouts.
//!
//! # Example
//!
//! ```rust
//! use statelog::definition::{MachineBuilder, TransitionBuilder};
//! use statelog::engine::Engine;
//! use statelog::log::MemoryLog;
//! use serde::{Deserialize, Serialize};
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
//! struct Counter {
//!     counter: i64,
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let definition = MachineBuilder::new()
//!     .initial("idle")
//!     .context(Counter::default())
//!     .transition(
//!         TransitionBuilder::new()
//!             .from("idle")
//!             .on("START")
//!             .to("running")
//!             .apply(|ctx: &mut Counter, n: &Value| ctx.counter = n.as_i64().unwrap_or(0)),
//!     )
//!     .state("running")
//!     .build()
//!     .unwrap();
//!
//! let mut engine = Engine::new(Arc::new(definition), MemoryLog::new());
//! engine.open().await.unwrap();
//!
//! let committed = engine.action("START", json!(5)).await.unwrap();
//! assert_eq!(committed.state, "running");
//! assert_eq!(engine.context().counter, 5);
//! assert_eq!(engine.len(), 1);
//! # });
//! ```

mod cursor;
mod error;
mod execute;
mod lifecycle;
mod options;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::EngineError;
pub use options::{EngineOptions, DEFAULT_START_ACTION};

use crate::checkpoint::Checkpoint;
use crate::core::{Context, LogRecord, StateChange, StateId};
use crate::definition::MachineDefinition;
use crate::log::Log;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Live state machine bound to a log.
pub struct Engine<C: Context, L: Log<C>> {
    definition: Arc<MachineDefinition<C>>,
    log: L,
    options: EngineOptions,
    state: StateId,
    context: C,
    cursor: Option<usize>,
    // Set when a truncation removed the record the live state was loaded from.
    stale: bool,
    open: bool,
    subscribers: Vec<mpsc::UnboundedSender<StateChange<C>>>,
}

impl<C: Context, L: Log<C>> Engine<C, L> {
    /// Create an engine in the definition's initial state.
    ///
    /// The engine must be [opened](Self::open) before it accepts actions.
    pub fn new(definition: Arc<MachineDefinition<C>>, log: L) -> Self {
        let state = definition.initial_state().clone();
        let context = definition.initial_context().clone();
        Self {
            definition,
            log,
            options: EngineOptions::default(),
            state,
            context,
            cursor: None,
            stale: false,
            open: false,
            subscribers: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> &StateId {
        &self.state
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// True iff the underlying log holds no records.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Number of records in the underlying log.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Index of the historical record being shown, or `None` at the tip.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn definition(&self) -> &Arc<MachineDefinition<C>> {
        &self.definition
    }

    /// Action names valid from the current state, in lexical order.
    pub fn available_actions(&self) -> Vec<&str> {
        self.definition.available_actions(self.state.as_str())
    }

    /// Snapshot of the state currently shown.
    pub fn checkpoint(&self) -> Checkpoint<C> {
        Checkpoint::new(
            self.state.clone(),
            self.context.clone(),
            self.log.len(),
            self.cursor,
        )
    }

    /// Receive a [`StateChange`] for every notifying transition from now on.
    ///
    /// Subscribe before [`open`](Self::open) to observe the eager tip event.
    /// Dropping the receiver unsubscribes.
    ///
    /// The channel is unbounded so a slow reader never holds up a commit.
    /// Changes a subscriber does not read stay buffered, one per notifying
    /// transition, until it reads them or drops the receiver.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StateChange<C>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn has_subscribers(&self) -> bool {
        self.subscribers.iter().any(|tx| !tx.is_closed())
    }

    fn emit(&mut self, previous_context: Option<C>) {
        if self.subscribers.is_empty() {
            return;
        }
        let change = StateChange {
            state: self.state.clone(),
            context: self.context.clone(),
            previous_context,
        };
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }

    /// True after [`truncate`](Self::truncate) removed the record currently
    /// loaded. Actions are refused until [`sync`](Self::sync) or
    /// [`open`](Self::open) reloads the tip.
    pub fn needs_sync(&self) -> bool {
        self.stale
    }

    fn ensure_open(&self) -> Result<(), EngineError> {
        if self.open {
            Ok(())
        } else {
            Err(EngineError::NotOpen)
        }
    }

    /// Replace the live state with a record read from the log.
    fn load(&mut self, record: LogRecord<C>) -> Result<(), EngineError> {
        if !self.definition.contains_state(record.state.as_str()) {
            return Err(EngineError::UnknownState(record.state));
        }
        self.state = record.state;
        self.context = record.context;
        self.stale = false;
        Ok(())
    }

    fn reset_to_initial(&mut self) {
        self.state = self.definition.initial_state().clone();
        self.context = self.definition.initial_context().clone();
        self.stale = false;
    }
}
