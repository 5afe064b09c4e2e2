//! Bidirectional stream adapter: actions in, state changes out.
//!
//! [`MachineStream::open`] hands the engine to a worker task. Writes travel
//! over a single-slot channel together with a oneshot acknowledgement, and
//! [`MachineStream::write`] only returns once the worker reports that the
//! action settled. A writer therefore never has more than one action in
//! flight, and a fast producer is throttled to the log's append latency.
//!
//! The readable side is the engine's own subscription: one [`StateChange`] per
//! notifying transition, preceded by the tip when the engine runs in eager
//! mode over a non-empty log.

use crate::core::{ActionMessage, Context, LogRecord, StateChange};
use crate::engine::{Engine, EngineError};
use crate::log::Log;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

type Ack<C> = oneshot::Sender<Result<LogRecord<C>, EngineError>>;

struct Command<C> {
    message: ActionMessage,
    ack: Ack<C>,
}

/// Readable half: state changes in commit order.
///
/// Changes are buffered without bound until read. Keep reading, or drop the
/// reader to unsubscribe, when only the writable half is needed.
pub struct StateReader<C> {
    inner: mpsc::UnboundedReceiver<StateChange<C>>,
}

impl<C> StateReader<C> {
    /// Wait for the next change. `None` once the engine has been closed and
    /// every buffered change was read.
    pub async fn recv(&mut self) -> Option<StateChange<C>> {
        self.inner.recv().await
    }

    /// Take a buffered change without waiting.
    pub fn try_recv(&mut self) -> Option<StateChange<C>> {
        self.inner.try_recv().ok()
    }
}

impl<C> Stream for StateReader<C> {
    type Item = StateChange<C>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_recv(cx)
    }
}

/// An engine driven through messages.
///
/// # Example
///
/// ```rust
/// use statelog::core::ActionMessage;
/// use statelog::definition::{MachineBuilder, TransitionBuilder};
/// use statelog::engine::Engine;
/// use statelog::log::MemoryLog;
/// use statelog::stream::MachineStream;
/// use serde_json::{json, Value};
/// use std::sync::Arc;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let definition = MachineBuilder::new()
///     .initial("off")
///     .context(json!({ "flips": 0 }))
///     .transition(
///         TransitionBuilder::new()
///             .from("off")
///             .on("FLIP")
///             .to("on")
///             .apply(|ctx: &mut Value, _: &Value| ctx["flips"] = json!(1)),
///     )
///     .state("on")
///     .build()
///     .unwrap();
///
/// let engine = Engine::new(Arc::new(definition), MemoryLog::new());
/// let mut stream = MachineStream::open(engine).await.unwrap();
///
/// stream.write(ActionMessage::new("FLIP")).await.unwrap();
/// let change = stream.states().recv().await.unwrap();
/// assert_eq!(change.state, "on");
///
/// stream.close().await.unwrap();
/// # });
/// ```
pub struct MachineStream<C> {
    writer: ActionWriter<C>,
    states: StateReader<C>,
}

impl<C: Context> MachineStream<C> {
    /// Subscribe, open the engine, and start the worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn open<L>(mut engine: Engine<C, L>) -> Result<Self, EngineError>
    where
        L: Log<C> + 'static,
    {
        let states = engine.subscribe();
        engine.open().await?;

        let (commands, inbox) = mpsc::channel(1);
        let worker = tokio::spawn(run(engine, inbox));

        Ok(Self {
            writer: ActionWriter { commands, worker },
            states: StateReader { inner: states },
        })
    }

    /// Send one action and wait until it has been committed or rejected.
    pub async fn write(&mut self, message: ActionMessage) -> Result<LogRecord<C>, EngineError> {
        self.writer.write(message).await
    }

    pub fn states(&mut self) -> &mut StateReader<C> {
        &mut self.states
    }

    /// Split into the writable and readable halves.
    pub fn split(self) -> (ActionWriter<C>, StateReader<C>) {
        (self.writer, self.states)
    }

    /// Stop accepting actions, close the engine, and return its close result.
    pub async fn close(self) -> Result<(), EngineError> {
        self.writer.close().await
    }
}

/// Writable half of a split [`MachineStream`].
pub struct ActionWriter<C> {
    commands: mpsc::Sender<Command<C>>,
    worker: JoinHandle<Result<(), EngineError>>,
}

impl<C: Context> ActionWriter<C> {
    /// Send one action and wait until it has been committed or rejected.
    pub async fn write(&mut self, message: ActionMessage) -> Result<LogRecord<C>, EngineError> {
        let (ack, settled) = oneshot::channel();
        self.commands
            .send(Command { message, ack })
            .await
            .map_err(|_| EngineError::StreamClosed)?;
        settled.await.map_err(|_| EngineError::StreamClosed)?
    }

    /// Stop accepting actions, close the engine, and return its close result.
    pub async fn close(self) -> Result<(), EngineError> {
        drop(self.commands);
        match self.worker.await {
            Ok(result) => result,
            Err(e) => Err(EngineError::Worker(e.to_string())),
        }
    }
}

async fn run<C, L>(
    mut engine: Engine<C, L>,
    mut inbox: mpsc::Receiver<Command<C>>,
) -> Result<(), EngineError>
where
    C: Context,
    L: Log<C>,
{
    info!(state = %engine.state(), "machine stream started");

    while let Some(Command { message, ack }) = inbox.recv().await {
        let result = engine.action(&message.action, message.value).await;
        if ack.send(result).is_err() {
            debug!(action = %message.action, "writer went away before acknowledgement");
        }
    }

    info!(state = %engine.state(), "machine stream shutting down");
    engine.close().await
}
