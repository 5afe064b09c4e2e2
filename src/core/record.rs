//! State identifiers and the records persisted to the log.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of a state in a machine definition.
///
/// Serialized as a bare string so records stay readable in any encoding.
///
/// # Example
///
/// ```rust
/// use statelog::core::StateId;
///
/// let id = StateId::from("idle");
/// assert_eq!(id.as_str(), "idle");
/// assert_eq!(id, "idle");
/// assert_eq!(serde_json::to_string(&id).unwrap(), "\"idle\"");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for StateId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for StateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StateId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StateId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The post-transition snapshot persisted for one log index.
///
/// Exactly one record is written per committed transition. Records are never
/// modified once appended; truncation is the only way they disappear.
///
/// # Example
///
/// ```rust
/// use statelog::core::LogRecord;
/// use serde_json::json;
///
/// let record = LogRecord::new("running", json!({ "counter": 1 }));
/// let encoded = serde_json::to_value(&record).unwrap();
/// assert_eq!(encoded, json!({ "state": "running", "context": { "counter": 1 } }));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogRecord<C> {
    /// State the machine was in after the transition
    pub state: StateId,
    /// Context after the transition's `apply` ran
    pub context: C,
}

impl<C> LogRecord<C> {
    pub fn new(state: impl Into<StateId>, context: C) -> Self {
        Self {
            state: state.into(),
            context,
        }
    }
}
