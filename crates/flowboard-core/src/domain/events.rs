//! Events - ドメインイベント
//!
//! Board に確定した変更と進捗シグナルを表します。EventSink へ送られます。

use serde::Serialize;

use super::{ColumnId, OperationId, Priority, ProgressKind, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    ProgressStarted {
        kind: ProgressKind,
        op: OperationId,
    },
    ProgressTicked {
        kind: ProgressKind,
        op: OperationId,
        percent: u8,
    },
    ProgressCompleted {
        kind: ProgressKind,
        op: OperationId,
    },
    TaskCreated {
        task_id: TaskId,
        priority: Priority,
    },
    TaskMoved {
        task_id: TaskId,
        from: ColumnId,
        to: ColumnId,
    },
    CommentAdded {
        task_id: TaskId,
        index: usize,
    },
    AttachmentAdded {
        task_id: TaskId,
        filename: String,
    },
}

impl BoardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::ProgressStarted { .. } => "progress_started",
            BoardEvent::ProgressTicked { .. } => "progress_ticked",
            BoardEvent::ProgressCompleted { .. } => "progress_completed",
            BoardEvent::TaskCreated { .. } => "task_created",
            BoardEvent::TaskMoved { .. } => "task_moved",
            BoardEvent::CommentAdded { .. } => "comment_added",
            BoardEvent::AttachmentAdded { .. } => "attachment_added",
        }
    }
}
