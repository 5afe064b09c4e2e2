//! Machines shared by the integration tests.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use serde_json::Value;
use statelog::definition::{MachineBuilder, MachineDefinition, TransitionBuilder};
use std::sync::Arc;

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Counter {
    pub counter: i64,
}

/// idle --START(n)--> running --INCREMENT--> running --STOP(final?)--> idle
pub fn counter_machine() -> Arc<MachineDefinition<Counter>> {
    let definition = MachineBuilder::new()
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
        .build()
        .expect("counter machine is valid");
    Arc::new(definition)
}

pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
}
