//! Errors reported while building a machine definition.

use crate::core::StateId;
use thiserror::Error;

/// A single problem found in a machine definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionError {
    #[error("initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("initial context not specified. Call .context(value) before .build()")]
    MissingInitialContext,

    #[error("transition #{index} has no source state. Call .from(state) or .from_any()")]
    MissingSource { index: usize },

    #[error("transition #{index} has no action name. Call .on(action)")]
    MissingAction { index: usize },

    #[error("initial state '{0}' is not declared")]
    UnknownInitialState(StateId),

    #[error("transition '{action}' from '{from}' targets undeclared state '{target}'")]
    DanglingTarget {
        from: String,
        action: String,
        target: StateId,
    },

    #[error("state '{state}' defines action '{action}' more than once")]
    DuplicateTransition { state: String, action: String },

    #[error("action '{action}' is declared for any state but wildcard fallback is disabled")]
    WildcardDisabled { action: String },
}

/// Every problem found in a machine definition. Never empty.
#[derive(Debug, Error)]
#[error("invalid machine definition: {}", join(.errors))]
pub struct BuildError {
    errors: Vec<DefinitionError>,
}

impl BuildError {
    pub(crate) fn new(errors: Vec<DefinitionError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[DefinitionError] {
        &self.errors
    }
}

fn join(errors: &[DefinitionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
