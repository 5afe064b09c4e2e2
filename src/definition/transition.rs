//! Transitions and the builder used to declare them.

use crate::core::{Context, StateId};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Context-mutating body of a transition.
///
/// Receives the live context and the action's payload. Synchronous bodies are
/// wrapped into an already-resolved future.
pub type ApplyFn<C> =
    Arc<dyn for<'a> Fn(&'a mut C, &'a Value) -> BoxFuture<'a, ()> + Send + Sync>;

fn boxed_apply<C, F>(f: F) -> ApplyFn<C>
where
    F: for<'a> Fn(&'a mut C, &'a Value) -> BoxFuture<'a, ()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Where a transition may be taken from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionSource {
    /// Only from the named state
    State(StateId),
    /// From any state that does not define the action itself
    Any,
}

impl fmt::Display for TransitionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State(id) => write!(f, "{id}"),
            Self::Any => f.write_str("*"),
        }
    }
}

/// A named edge out of a state.
///
/// A transition without a target is a self-loop: it still mutates the context
/// and still produces a log record, but the state id does not change.
pub struct Transition<C> {
    action: String,
    target: Option<StateId>,
    apply: Option<ApplyFn<C>>,
}

impl<C: Context> Transition<C> {
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Explicit target, if any.
    pub fn target(&self) -> Option<&StateId> {
        self.target.as_ref()
    }

    pub fn is_self_loop(&self) -> bool {
        self.target.is_none()
    }

    /// Run the transition body against `context`.
    pub async fn run(&self, context: &mut C, payload: &Value) {
        if let Some(apply) = &self.apply {
            apply(context, payload).await;
        }
    }
}

impl<C> Clone for Transition<C> {
    fn clone(&self) -> Self {
        Self {
            action: self.action.clone(),
            target: self.target.clone(),
            apply: self.apply.clone(),
        }
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("action", &self.action)
            .field("target", &self.target)
            .field("has_apply", &self.apply.is_some())
            .finish()
    }
}

/// Builder for declaring transitions with a fluent API.
///
/// Missing fields are not reported here; the machine builder validates every
/// transition at once so all problems surface together.
///
/// # Example
///
/// ```rust
/// use statelog::definition::TransitionBuilder;
/// use serde::{Deserialize, Serialize};
/// use serde_json::Value;
///
/// #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
/// struct Counter {
///     counter: i64,
/// }
///
/// let increment = TransitionBuilder::new()
///     .from("running")
///     .on("INCREMENT")
///     .to("running")
///     .apply(|ctx: &mut Counter, _: &Value| ctx.counter += 1);
/// ```
pub struct TransitionBuilder<C> {
    pub(crate) source: Option<TransitionSource>,
    pub(crate) action: Option<String>,
    pub(crate) target: Option<StateId>,
    pub(crate) apply: Option<ApplyFn<C>>,
}

impl<C: Context> TransitionBuilder<C> {
    pub fn new() -> Self {
        Self {
            source: None,
            action: None,
            target: None,
            apply: None,
        }
    }

    /// Set the source state (required, unless `from_any` is used).
    pub fn from(mut self, state: impl Into<StateId>) -> Self {
        self.source = Some(TransitionSource::State(state.into()));
        self
    }

    /// Make this transition available from every state.
    ///
    /// Only accepted when the machine is built with wildcard fallback enabled.
    pub fn from_any(mut self) -> Self {
        self.source = Some(TransitionSource::Any);
        self
    }

    /// Set the action name (required).
    pub fn on(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the target state. Leave unset for a self-loop.
    pub fn to(mut self, state: impl Into<StateId>) -> Self {
        self.target = Some(state.into());
        self
    }

    /// Set a synchronous body.
    pub fn apply<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut C, &Value) + Send + Sync + 'static,
    {
        self.apply = Some(boxed_apply(move |context: &mut C, payload: &Value| {
            f(context, payload);
            future::ready(()).boxed()
        }));
        self
    }

    /// Set an asynchronous body.
    pub fn apply_async<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut C, &'a Value) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.apply = Some(boxed_apply(f));
        self
    }

    pub(crate) fn into_parts(self) -> (Option<TransitionSource>, Option<String>, Transition<C>) {
        let action = self.action.clone();
        (
            self.source,
            action,
            Transition {
                action: self.action.unwrap_or_default(),
                target: self.target,
                apply: self.apply,
            },
        )
    }
}

impl<C: Context> Default for TransitionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
