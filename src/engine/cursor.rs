//! Read-only navigation over the log, plus truncation.

use super::{Engine, EngineError};
use crate::core::Context;
use crate::log::Log;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug)]
enum Direction {
    Forward,
    Backward,
}

impl<C: Context, L: Log<C>> Engine<C, L> {
    /// Show the next record. A no-op at the tip.
    pub async fn forward(&mut self) -> Result<(), EngineError> {
        self.step(Direction::Forward).await
    }

    /// Show the previous record. A no-op at index 0.
    pub async fn backward(&mut self) -> Result<(), EngineError> {
        self.step(Direction::Backward).await
    }

    // A detached cursor counts from its own index; at the tip it counts from
    // `length - 1`. Landing back on the tip re-attaches.
    async fn step(&mut self, direction: Direction) -> Result<(), EngineError> {
        self.ensure_open()?;

        let length = self.log.len();
        let origin = self.cursor.unwrap_or(length.saturating_sub(1));
        let target = match direction {
            Direction::Forward => origin.checked_add(1),
            Direction::Backward => origin.checked_sub(1),
        };
        let Some(index) = target.filter(|index| *index < length) else {
            trace!(?direction, origin, length, "cursor already at the boundary");
            return Ok(());
        };

        let record = self.log.get(index).await?;
        self.load(record)?;
        self.cursor = (index + 1 < length).then_some(index);
        debug!(?direction, index, length, state = %self.state, "cursor moved");
        Ok(())
    }

    /// Discard every record at and after `len`.
    ///
    /// The live state is not reloaded. Truncating to `cursor + 1` turns the
    /// record being shown into the tip, re-attaches the cursor and allows
    /// actions to continue from it. If the record the engine was loaded from
    /// is removed instead, actions fail with [`EngineError::NeedsSync`] until
    /// [`sync`](Self::sync) or [`open`](Self::open) reloads the new tip.
    pub async fn truncate(&mut self, len: usize) -> Result<(), EngineError> {
        self.ensure_open()?;

        let before = self.log.len();
        self.log.truncate(len).await?;

        // Index of the record the live state came from, if any.
        let loaded = self.cursor.or_else(|| before.checked_sub(1));
        match loaded {
            Some(index) if index >= len => {
                self.cursor = None;
                self.stale = true;
            }
            Some(index) if index + 1 == len => self.cursor = None,
            _ => {}
        }
        debug!(len, cursor = ?self.cursor, needs_sync = self.stale, "log truncated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{counter_definition, Counter};
    use super::*;
    use crate::core::LogRecord;
    use crate::log::MemoryLog;
    use serde_json::{json, Value};

    async fn three_records() -> (Engine<Counter, MemoryLog<Counter>>, MemoryLog<Counter>) {
        let log = MemoryLog::new();
        let mut engine = Engine::new(counter_definition(), log.clone());
        engine.open().await.unwrap();
        engine.action("START", json!(1)).await.unwrap();
        engine.action("INCREMENT", Value::Null).await.unwrap();
        engine.action("STOP", Value::Null).await.unwrap();
        (engine, log)
    }

    #[tokio::test]
    async fn backward_then_forward_returns_to_tip() {
        let (mut engine, _) = three_records().await;
        let tip = (engine.state().clone(), engine.context().clone());

        engine.backward().await.unwrap();
        assert_eq!(engine.cursor(), Some(1));
        assert_eq!(engine.state(), "running");
        assert_eq!(engine.context(), &Counter { counter: 2 });

        engine.forward().await.unwrap();
        assert_eq!(engine.cursor(), None);
        assert_eq!((engine.state().clone(), engine.context().clone()), tip);
    }

    #[tokio::test]
    async fn moves_past_the_ends_are_no_ops() {
        let (mut engine, _) = three_records().await;

        engine.forward().await.unwrap();
        assert_eq!(engine.cursor(), None);
        assert_eq!(engine.state(), "idle");

        engine.backward().await.unwrap();
        engine.backward().await.unwrap();
        assert_eq!(engine.cursor(), Some(0));
        assert_eq!(engine.context(), &Counter { counter: 1 });

        engine.backward().await.unwrap();
        assert_eq!(engine.cursor(), Some(0));
        assert_eq!(engine.context(), &Counter { counter: 1 });
    }

    #[tokio::test]
    async fn navigation_on_empty_log_does_nothing() {
        let mut engine = Engine::new(counter_definition(), MemoryLog::new());
        engine.open().await.unwrap();

        engine.backward().await.unwrap();
        engine.forward().await.unwrap();

        assert_eq!(engine.cursor(), None);
        assert_eq!(engine.state(), "idle");
    }

    #[tokio::test]
    async fn navigation_never_appends_or_notifies() {
        let (mut engine, log) = three_records().await;
        let mut changes = engine.subscribe();

        engine.backward().await.unwrap();
        engine.backward().await.unwrap();
        engine.forward().await.unwrap();

        assert_eq!(log.records().len(), 3);
        assert!(changes.try_recv().is_err());
    }

    #[tokio::test]
    async fn actions_are_rejected_while_detached() {
        let (mut engine, log) = three_records().await;
        engine.backward().await.unwrap();

        let error = engine.action("INCREMENT", Value::Null).await.unwrap_err();

        assert!(matches!(
            error,
            EngineError::DetachedCursor {
                index: 1,
                length: 3
            }
        ));
        assert_eq!(log.records().len(), 3);
        assert_eq!(engine.context(), &Counter { counter: 2 });
    }

    #[tokio::test]
    async fn truncating_to_cursor_forks_history() {
        let (mut engine, log) = three_records().await;
        engine.backward().await.unwrap();

        engine.truncate(2).await.unwrap();
        assert_eq!(engine.cursor(), None);

        engine.action("INCREMENT", Value::Null).await.unwrap();
        assert_eq!(
            log.records(),
            vec![
                LogRecord::new("running", Counter { counter: 1 }),
                LogRecord::new("running", Counter { counter: 2 }),
                LogRecord::new("running", Counter { counter: 3 }),
            ]
        );
    }

    #[tokio::test]
    async fn truncating_away_the_shown_record_requires_sync() {
        let (mut engine, log) = three_records().await;
        engine.backward().await.unwrap();

        engine.truncate(1).await.unwrap();
        assert_eq!(engine.cursor(), None);
        assert!(engine.needs_sync());

        let error = engine.action("INCREMENT", Value::Null).await.unwrap_err();
        assert!(matches!(error, EngineError::NeedsSync { length: 1 }));
        assert_eq!(log.records().len(), 1);

        engine.sync().await.unwrap();
        assert!(!engine.needs_sync());
        engine.action("INCREMENT", Value::Null).await.unwrap();
        assert_eq!(
            log.records(),
            vec![
                LogRecord::new("running", Counter { counter: 1 }),
                LogRecord::new("running", Counter { counter: 2 }),
            ]
        );
    }

    #[tokio::test]
    async fn truncating_under_the_tip_requires_sync() {
        let log = MemoryLog::new();
        let mut engine = Engine::new(counter_definition(), log.clone());
        engine.open().await.unwrap();
        engine.action("START", json!(1)).await.unwrap();
        engine.action("STOP", Value::Null).await.unwrap();

        engine.truncate(1).await.unwrap();
        assert_eq!(engine.state(), "idle");

        let error = engine.action("START", json!(7)).await.unwrap_err();
        assert!(matches!(error, EngineError::NeedsSync { length: 1 }));
        assert_eq!(log.records().len(), 1);

        engine.sync().await.unwrap();
        assert_eq!(engine.state(), "running");
        let error = engine.action("START", json!(7)).await.unwrap_err();
        assert!(matches!(error, EngineError::InvalidAction { .. }));
    }

    #[tokio::test]
    async fn truncate_past_the_tip_keeps_engine_usable() {
        let (mut engine, log) = three_records().await;

        engine.truncate(3).await.unwrap();
        engine.truncate(10).await.unwrap();

        assert!(!engine.needs_sync());
        engine.action("START", json!(4)).await.unwrap();
        assert_eq!(log.records().len(), 4);
    }

    #[tokio::test]
    async fn truncate_keeps_cursor_below_new_tip() {
        let (mut engine, _) = three_records().await;
        engine.backward().await.unwrap();
        engine.backward().await.unwrap();

        engine.truncate(2).await.unwrap();
        assert_eq!(engine.cursor(), Some(0));

        engine.sync().await.unwrap();
        assert_eq!(engine.cursor(), None);
        assert_eq!(engine.context(), &Counter { counter: 2 });
    }

    #[tokio::test]
    async fn truncate_to_zero_then_sync_returns_to_initial() {
        let (mut engine, _) = three_records().await;

        engine.truncate(0).await.unwrap();
        engine.sync().await.unwrap();

        assert!(engine.is_empty());
        assert_eq!(engine.state(), "idle");
        assert_eq!(engine.context(), &Counter::default());
    }
}
