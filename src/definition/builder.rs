//! Builder for constructing machine definitions.

use super::error::{BuildError, DefinitionError};
use super::transition::{Transition, TransitionBuilder, TransitionSource};
use super::{MachineDefinition, StateNode, WildcardFallback};
use crate::core::{Context, StateId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<DefinitionError>>;

/// Builder for machine definitions with a fluent API.
///
/// States are declared either explicitly with [`state`](Self::state) or
/// implicitly as the source of a transition. Targets never declare a state:
/// a target that names nothing is reported as
/// [`DefinitionError::DanglingTarget`].
pub struct MachineBuilder<C: Context> {
    initial: Option<StateId>,
    context: Option<C>,
    states: BTreeSet<StateId>,
    transitions: Vec<TransitionBuilder<C>>,
    wildcard: WildcardFallback,
}

impl<C: Context> MachineBuilder<C> {
    pub fn new() -> Self {
        Self {
            initial: None,
            context: None,
            states: BTreeSet::new(),
            transitions: Vec::new(),
            wildcard: WildcardFallback::Disabled,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<StateId>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Set the initial context (required).
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Declare a state, typically one with no outgoing transitions.
    pub fn state(mut self, state: impl Into<StateId>) -> Self {
        self.states.insert(state.into());
        self
    }

    /// Add a transition.
    pub fn transition(mut self, transition: TransitionBuilder<C>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<TransitionBuilder<C>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Choose whether any-state transitions are merged into every state.
    pub fn wildcard(mut self, fallback: WildcardFallback) -> Self {
        self.wildcard = fallback;
        self
    }

    /// Validate and build the definition.
    ///
    /// All problems are collected before returning, so a single call reports
    /// every missing field, dangling target and duplicate at once.
    pub fn build(self) -> Result<MachineDefinition<C>, BuildError> {
        let mut checks: Vec<Check> = Vec::new();
        let mut declared = self.states;
        let mut parts = Vec::with_capacity(self.transitions.len());

        for (index, builder) in self.transitions.into_iter().enumerate() {
            let (source, action, transition) = builder.into_parts();

            let source = match source {
                Some(source) => source,
                None => {
                    checks.push(Validation::fail(DefinitionError::MissingSource { index }));
                    continue;
                }
            };
            if action.is_none() {
                checks.push(Validation::fail(DefinitionError::MissingAction { index }));
                continue;
            }
            if let TransitionSource::State(state) = &source {
                declared.insert(state.clone());
            }
            parts.push((source, transition));
        }

        let initial = self.initial;
        checks.push(match &initial {
            None => Validation::fail(DefinitionError::MissingInitialState),
            Some(state) if !declared.contains(state) => {
                Validation::fail(DefinitionError::UnknownInitialState(state.clone()))
            }
            Some(_) => Validation::success(()),
        });
        checks.push(match &self.context {
            None => Validation::fail(DefinitionError::MissingInitialContext),
            Some(_) => Validation::success(()),
        });

        let mut own: BTreeMap<StateId, BTreeMap<String, Arc<Transition<C>>>> = declared
            .iter()
            .map(|state| (state.clone(), BTreeMap::new()))
            .collect();
        let mut any_state: BTreeMap<String, Arc<Transition<C>>> = BTreeMap::new();

        for (source, transition) in parts {
            checks.push(check_target(&source, &transition, &declared));

            let action = transition.action().to_string();
            let table = match &source {
                TransitionSource::State(state) => own.entry(state.clone()).or_default(),
                TransitionSource::Any => {
                    if self.wildcard == WildcardFallback::Disabled {
                        checks.push(Validation::fail(DefinitionError::WildcardDisabled {
                            action: action.clone(),
                        }));
                    }
                    &mut any_state
                }
            };
            if table.contains_key(&action) {
                checks.push(Validation::fail(DefinitionError::DuplicateTransition {
                    state: source.to_string(),
                    action,
                }));
                continue;
            }
            table.insert(action, Arc::new(transition));
        }

        match Validation::all_vec(checks).map(|_| ()) {
            Validation::Failure(errors) => {
                return Err(BuildError::new(errors.iter().cloned().collect()));
            }
            Validation::Success(()) => {}
        }

        let (Some(initial_state), Some(initial_context)) = (initial, self.context) else {
            return Err(BuildError::new(vec![DefinitionError::MissingInitialState]));
        };

        let states = own
            .into_iter()
            .map(|(state, mut transitions)| {
                if self.wildcard == WildcardFallback::Enabled {
                    for (action, transition) in &any_state {
                        transitions
                            .entry(action.clone())
                            .or_insert_with(|| Arc::clone(transition));
                    }
                }
                (state, StateNode { transitions })
            })
            .collect();

        Ok(MachineDefinition {
            initial_state,
            initial_context,
            states,
            wildcard: self.wildcard,
        })
    }
}

fn check_target<C: Context>(
    source: &TransitionSource,
    transition: &Transition<C>,
    declared: &BTreeSet<StateId>,
) -> Check {
    match transition.target() {
        Some(target) if !declared.contains(target) => {
            Validation::fail(DefinitionError::DanglingTarget {
                from: source.to_string(),
                action: transition.action().to_string(),
                target: target.clone(),
            })
        }
        _ => Validation::success(()),
    }
}

impl<C: Context> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
    struct Counter {
        counter: i64,
    }

    fn step(from: &str, action: &str, to: &str) -> TransitionBuilder<Counter> {
        TransitionBuilder::new().from(from).on(action).to(to)
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = MachineBuilder::<Counter>::new().build();

        let error = result.unwrap_err();
        assert!(error
            .errors()
            .contains(&DefinitionError::MissingInitialState));
        assert!(error
            .errors()
            .contains(&DefinitionError::MissingInitialContext));
    }

    #[test]
    fn builder_accumulates_all_problems() {
        let result = MachineBuilder::new()
            .initial("idle")
            .context(Counter::default())
            .transition(step("idle", "GO", "nowhere"))
            .transition(step("idle", "GO", "idle"))
            .transition(TransitionBuilder::new().on("ORPHAN"))
            .transition(TransitionBuilder::new().from("idle"))
            .build();

        let errors = result.unwrap_err().errors().to_vec();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&DefinitionError::DanglingTarget {
            from: "idle".to_string(),
            action: "GO".to_string(),
            target: StateId::from("nowhere"),
        }));
        assert!(errors.contains(&DefinitionError::DuplicateTransition {
            state: "idle".to_string(),
            action: "GO".to_string(),
        }));
        assert!(errors.contains(&DefinitionError::MissingSource { index: 2 }));
        assert!(errors.contains(&DefinitionError::MissingAction { index: 3 }));
    }

    #[test]
    fn targets_do_not_declare_states() {
        let result = MachineBuilder::new()
            .initial("idle")
            .context(Counter::default())
            .transition(step("idle", "FINISH", "done"))
            .build();
        assert!(result.is_err());

        let result = MachineBuilder::new()
            .initial("idle")
            .context(Counter::default())
            .state("done")
            .transition(step("idle", "FINISH", "done"))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn initial_state_must_be_declared() {
        let result = MachineBuilder::new()
            .initial("missing")
            .context(Counter::default())
            .state("idle")
            .build();

        let errors = result.unwrap_err().errors().to_vec();
        assert_eq!(
            errors,
            vec![DefinitionError::UnknownInitialState(StateId::from("missing"))]
        );
    }

    #[test]
    fn any_state_transitions_require_enabled_fallback() {
        let reset = || {
            TransitionBuilder::new()
                .from_any()
                .on("RESET")
                .to("idle")
                .apply(|ctx: &mut Counter, _: &Value| ctx.counter = 0)
        };

        let disabled = MachineBuilder::new()
            .initial("idle")
            .context(Counter::default())
            .state("idle")
            .transition(reset())
            .build();
        let errors = disabled.unwrap_err().errors().to_vec();
        assert_eq!(
            errors,
            vec![DefinitionError::WildcardDisabled {
                action: "RESET".to_string()
            }]
        );

        let enabled = MachineBuilder::new()
            .initial("idle")
            .context(Counter::default())
            .state("idle")
            .transition(reset())
            .wildcard(WildcardFallback::Enabled)
            .build();
        assert!(enabled.is_ok());
    }

    #[test]
    fn wildcard_targets_are_validated() {
        let result = MachineBuilder::new()
            .initial("idle")
            .context(Counter::default())
            .state("idle")
            .transition(TransitionBuilder::new().from_any().on("ABORT").to("failed"))
            .wildcard(WildcardFallback::Enabled)
            .build();

        let errors = result.unwrap_err().errors().to_vec();
        assert_eq!(
            errors,
            vec![DefinitionError::DanglingTarget {
                from: "*".to_string(),
                action: "ABORT".to_string(),
                target: StateId::from("failed"),
            }]
        );
    }
}
