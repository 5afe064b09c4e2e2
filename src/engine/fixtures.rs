//! Shared machines and logs for engine unit tests.

use crate::core::{Context, LogRecord};
use crate::definition::{MachineBuilder, MachineDefinition, TransitionBuilder};
use crate::log::{Log, LogError, MemoryLog};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub(crate) struct Counter {
    pub counter: i64,
}

/// idle --START(n)--> running --INCREMENT--> running --STOP(final?)--> idle
pub(crate) fn counter_builder() -> MachineBuilder<Counter> {
    MachineBuilder::new()
        .initial("idle")
        .context(Counter::default())
        .transition(
            TransitionBuilder::new()
                .from("idle")
                .on("START")
                .to("running")
                .apply(|ctx: &mut Counter, n: &Value| ctx.counter = n.as_i64().unwrap_or(0)),
        )
        .transition(
            TransitionBuilder::new()
                .from("running")
                .on("INCREMENT")
                .to("running")
                .apply(|ctx: &mut Counter, _: &Value| ctx.counter += 1),
        )
        .transition(
            TransitionBuilder::new()
                .from("running")
                .on("STOP")
                .to("idle")
                .apply(|ctx: &mut Counter, value: &Value| {
                    if let Some(last) = value.as_i64() {
                        ctx.counter = last;
                    }
                }),
        )
}

pub(crate) fn counter_definition() -> Arc<MachineDefinition<Counter>> {
    Arc::new(counter_builder().build().unwrap())
}

/// Memory log whose appends can be made to fail.
pub(crate) struct FlakyLog<C> {
    pub inner: MemoryLog<C>,
    pub fail_appends: Arc<AtomicBool>,
}

impl<C: Context> FlakyLog<C> {
    pub fn new(inner: MemoryLog<C>) -> Self {
        Self {
            inner,
            fail_appends: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl<C: Context> Log<C> for FlakyLog<C> {
    async fn ready(&mut self) -> Result<(), LogError> {
        self.inner.ready().await
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    async fn get(&self, index: usize) -> Result<LogRecord<C>, LogError> {
        self.inner.get(index).await
    }

    async fn append(&mut self, record: LogRecord<C>) -> Result<(), LogError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(LogError::Backend("disk full".to_string()));
        }
        self.inner.append(record).await
    }

    async fn truncate(&mut self, len: usize) -> Result<(), LogError> {
        self.inner.truncate(len).await
    }

    async fn close(&mut self) -> Result<(), LogError> {
        self.inner.close().await
    }
}
