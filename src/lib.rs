//! Statelog: declarative state machines with an append-only history
//!
//! A machine is described once as data: an initial state, an initial context
//! and a table of transitions keyed by `(state, action)`. An engine runs that
//! description against a log. Every accepted action appends exactly one
//! `{state, context}` record, so reopening the log reproduces the live state
//! without replaying any transition bodies.
//!
//! # Core Concepts
//!
//! - **Definition**: validated, immutable transition table shared behind an `Arc`
//! - **Engine**: the live `{state, context}` pair bound to one log
//! - **Log**: the persistence seam; [`log::MemoryLog`] ships in the crate
//! - **Cursor**: read-only navigation through earlier records
//! - **Stream**: message-driven adapter with one action in flight at a time
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
//! let definition = Arc::new(
//!     MachineBuilder::new()
//!         .initial("idle")
//!         .context(Counter::default())
//!         .transition(
//!             TransitionBuilder::new()
//!                 .from("idle")
//!                 .on("START")
//!                 .to("running")
//!                 .apply(|ctx: &mut Counter, n: &Value| ctx.counter = n.as_i64().unwrap_or(0)),
//!         )
//!         .transition(
//!             TransitionBuilder::new()
//!                 .from("running")
//!                 .on("INCREMENT")
//!                 .to("running")
//!                 .apply(|ctx: &mut Counter, _: &Value| ctx.counter += 1),
//!         )
//!         .build()
//!         .unwrap(),
//! );
//!
//! let log = MemoryLog::new();
//! let mut engine = Engine::new(Arc::clone(&definition), log.clone());
//! engine.open().await.unwrap();
//! engine.action("START", json!(1)).await.unwrap();
//! engine.action("INCREMENT", Value::Null).await.unwrap();
//! engine.close().await.unwrap();
//!
//! // A second engine over the same records resumes where the first stopped.
//! let mut resumed = Engine::new(definition, log);
//! resumed.open().await.unwrap();
//! assert_eq!(resumed.state(), "running");
//! assert_eq!(resumed.context().counter, 2);
//! # });
//! ```

pub mod checkpoint;
pub mod core;
pub mod definition;
pub mod engine;
pub mod log;
pub mod stream;

// Re-export commonly used types
pub use checkpoint::{Checkpoint, CheckpointError};
pub use core::{ActionMessage, Context, LogRecord, StateChange, StateId};
pub use definition::{
    BuildError, DefinitionError, MachineBuilder, MachineDefinition, TransitionBuilder,
    WildcardFallback,
};
pub use engine::{Engine, EngineError, EngineOptions};
pub use log::{Log, LogError, MemoryLog};
pub use stream::MachineStream;
