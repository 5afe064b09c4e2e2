//! Messages exchanged through the stream adapter and subscriptions.

use super::record::StateId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to run one action.
///
/// `value` is the action's payload; it is `null` when omitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionMessage {
    pub action: String,
    #[serde(default)]
    pub value: Value,
}

impl ActionMessage {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            value: Value::Null,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }
}

/// Notification that the machine is now showing `state` with `context`.
///
/// `previous_context` is only populated when the engine was configured to
/// track it and someone was subscribed at the time of the transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateChange<C> {
    pub state: StateId,
    pub context: C,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_context: Option<C>,
}
