//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Action name of the resume pseudo-transition run on open.
pub const DEFAULT_START_ACTION: &str = "start";

/// Configuration for an [`Engine`](super::Engine).
///
/// Every field has a default, so hosts can load partial JSON.
///
/// # Example
///
/// ```
/// use statelog::engine::EngineOptions;
///
/// let options = EngineOptions::default()
///     .with_eager(true)
///     .with_start_action(None);
///
/// let loaded: EngineOptions = serde_json::from_str(r#"{ "eager": true, "start_action": null }"#).unwrap();
/// assert_eq!(options, loaded);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Surface the restored tip to subscribers once, right after open.
    ///
    /// Only fires when the log already holds records.
    /// Default: false.
    pub eager: bool,

    /// Reserved action run on open without being recorded.
    ///
    /// If the restored state defines this action, its target becomes the
    /// current state immediately; nothing is appended and nobody is notified.
    /// `None` disables the behavior.
    /// Default: `Some("start")`.
    pub start_action: Option<String>,

    /// Run the start transition's body in addition to moving to its target.
    /// Default: true.
    pub run_start_apply: bool,

    /// Notify subscribers for transitions without an explicit target.
    /// Default: false.
    pub emit_self_loops: bool,

    /// Attach a copy of the pre-transition context to change events.
    ///
    /// The copy is only taken when someone is subscribed.
    /// Default: false.
    pub previous_context: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            eager: false,
            start_action: Some(DEFAULT_START_ACTION.to_string()),
            run_start_apply: true,
            emit_self_loops: false,
            previous_context: false,
        }
    }
}

impl EngineOptions {
    pub fn with_eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    pub fn with_start_action(mut self, action: Option<String>) -> Self {
        self.start_action = action;
        self
    }

    pub fn with_run_start_apply(mut self, run: bool) -> Self {
        self.run_start_apply = run;
        self
    }

    pub fn with_emit_self_loops(mut self, emit: bool) -> Self {
        self.emit_self_loops = emit;
        self
    }

    pub fn with_previous_context(mut self, track: bool) -> Self {
        self.previous_context = track;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = EngineOptions::default();
        assert!(!options.eager);
        assert_eq!(options.start_action.as_deref(), Some("start"));
        assert!(options.run_start_apply);
        assert!(!options.emit_self_loops);
        assert!(!options.previous_context);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options: EngineOptions = serde_json::from_str(r#"{ "emit_self_loops": true }"#).unwrap();
        assert!(options.emit_self_loops);
        assert_eq!(options.start_action.as_deref(), Some(DEFAULT_START_ACTION));
    }
}
