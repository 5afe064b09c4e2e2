//! Core data types shared by every layer of the engine.
//!
//! - [`Context`]: the mutable payload carried alongside the current state
//! - [`StateId`] and [`LogRecord`]: what gets persisted for each committed transition
//! - [`ActionMessage`] and [`StateChange`]: the messages exchanged with the outside world
//!
//! Nothing in this module performs I/O.

mod context;
mod message;
mod record;

pub use context::Context;
pub use message::{ActionMessage, StateChange};
pub use record::{LogRecord, StateId};
