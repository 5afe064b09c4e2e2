//! The `Context` trait for values carried alongside machine state.
//!
//! A context is owned by exactly one engine at a time. It is mutated in place
//! by transitions and replaced wholesale when a record is loaded from the log.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Trait for machine contexts.
///
/// Any type that can be cloned, compared, debugged and round-tripped through
/// serde qualifies; the blanket implementation below means you never implement
/// this trait by hand.
///
/// # Required Traits
///
/// - `Clone`: the initial context is cloned into every engine, and records
///   carry a copy of the post-transition context
/// - `PartialEq`: replayed contexts can be compared with live ones
/// - `Debug`: contexts show up in diagnostics
/// - `Serialize` + `DeserializeOwned`: contexts are persisted in log records
///
/// # Example
///
/// ```rust
/// use statelog::core::Context;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
/// struct Counter {
///     counter: i64,
/// }
///
/// fn assert_context<C: Context>() {}
/// assert_context::<Counter>();
/// assert_context::<serde_json::Value>();
/// ```
pub trait Context:
    Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> Context for T where
    T: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}
