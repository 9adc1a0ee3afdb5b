//! EventSink の実装

use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::domain::BoardEvent;
use crate::ports::EventSink;

/// 何もしない（デフォルト）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &BoardEvent) {}
}

/// tracing にイベントを流す
///
/// tick は量が多いので debug、それ以外は info で出力します。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &BoardEvent) {
        match event {
            BoardEvent::ProgressTicked { kind, op, percent } => {
                debug!(%kind, %op, percent, "progress tick");
            }
            other => {
                let payload = serde_json::to_string(other).unwrap_or_default();
                info!(event = other.name(), %payload, "board event");
            }
        }
    }
}

/// メモリに記録する（テスト・デモ用）
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<BoardEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録済みイベントのコピー
    pub fn events(&self) -> Vec<BoardEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(BoardEvent::name)
            .collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &BoardEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnId, TaskId};
    use ulid::Ulid;

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingEventSink::new();
        let task_id = TaskId::from_ulid(Ulid::new());
        sink.emit(&BoardEvent::CommentAdded { task_id, index: 0 });
        sink.emit(&BoardEvent::TaskMoved {
            task_id,
            from: ColumnId::Todo,
            to: ColumnId::Doing,
        });

        assert_eq!(sink.names(), vec!["comment_added", "task_moved"]);
        assert_eq!(sink.events().len(), 2);
    }
}
