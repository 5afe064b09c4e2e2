//! Declarative machine definitions.
//!
//! A [`MachineDefinition`] is built once, validated eagerly, and then shared
//! (behind an `Arc`) by every engine that runs it. Engines never mutate it.
//!
//! Transition lookup is a single table indexed by `(state, action)`. Any-state
//! transitions are merged into that table at build time when
//! [`WildcardFallback::Enabled`] is chosen, so resolution never has to
//! consult a second table at dispatch time.
//!
//! # Example
//!
//! ```rust
//! use statelog::definition::{MachineBuilder, TransitionBuilder};
//! use serde::{Deserialize, Serialize};
//! use serde_json::Value;
//!
//! #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
//! struct Counter {
//!     counter: i64,
//! }
//!
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
//!     .transition(
//!         TransitionBuilder::new()
//!             .from("running")
//!             .on("STOP")
//!             .to("idle"),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(definition.available_actions("idle"), vec!["START"]);
//! assert!(definition.resolve("idle", "STOP").is_none());
//! ```

mod builder;
mod error;
mod transition;

pub use builder::MachineBuilder;
pub use error::{BuildError, DefinitionError};
pub use transition::{ApplyFn, Transition, TransitionBuilder, TransitionSource};

use crate::core::{Context, StateId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Whether any-state transitions take part in resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardFallback {
    /// Any-state transitions are rejected at build time
    #[default]
    Disabled,
    /// Any-state transitions apply to every state lacking the action
    Enabled,
}

/// Transitions available from one state, wildcard ones included.
#[derive(Debug)]
pub struct StateNode<C> {
    transitions: BTreeMap<String, Arc<Transition<C>>>,
}

impl<C: Context> StateNode<C> {
    pub fn transition(&self, action: &str) -> Option<&Transition<C>> {
        self.transitions.get(action).map(Arc::as_ref)
    }

    /// Action names in lexical order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    pub fn is_terminal(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Validated, immutable description of a state machine.
#[derive(Debug)]
pub struct MachineDefinition<C> {
    initial_state: StateId,
    initial_context: C,
    states: BTreeMap<StateId, StateNode<C>>,
    wildcard: WildcardFallback,
}

impl<C: Context> MachineDefinition<C> {
    pub fn builder() -> MachineBuilder<C> {
        MachineBuilder::new()
    }

    pub fn initial_state(&self) -> &StateId {
        &self.initial_state
    }

    pub fn initial_context(&self) -> &C {
        &self.initial_context
    }

    pub fn wildcard(&self) -> WildcardFallback {
        self.wildcard
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    pub fn state(&self, state: &str) -> Option<&StateNode<C>> {
        self.states.get(state)
    }

    /// Declared states in lexical order.
    pub fn states(&self) -> impl Iterator<Item = &StateId> {
        self.states.keys()
    }

    /// Find the transition for `action` in `state`.
    ///
    /// Returns `None` for unknown states as well as unknown actions.
    pub fn resolve(&self, state: &str, action: &str) -> Option<&Transition<C>> {
        let found = self.state(state).and_then(|node| node.transition(action));
        tracing::trace!(state, action, found = found.is_some(), "resolved transition");
        found
    }

    /// Action names valid from `state`, in lexical order.
    pub fn available_actions(&self, state: &str) -> Vec<&str> {
        self.state(state)
            .map(|node| node.actions().collect())
            .unwrap_or_default()
    }
}
