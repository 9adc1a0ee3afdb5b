//! TaskDetail - 選択中タスクの詳細ビュー
//!
//! コピーは持たず、Board から借用します。Board が変われば次に取得した
//! `TaskDetail` にそのまま反映されます。

use serde::Serialize;

use crate::domain::{Board, ColumnId, FlowStatus, Priority, Task, TaskId};

/// Live view of the selected task.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TaskDetail<'a> {
    #[serde(flatten)]
    task: &'a Task,
    column: ColumnId,
    /// Upload percent when the running upload targets this task.
    upload_percent: Option<u8>,
}

impl<'a> TaskDetail<'a> {
    pub(crate) fn new(task: &'a Task, column: ColumnId, upload_percent: Option<u8>) -> Self {
        Self {
            task,
            column,
            upload_percent,
        }
    }

    pub fn id(&self) -> TaskId {
        self.task.id()
    }

    pub fn content(&self) -> &'a str {
        self.task.content()
    }

    pub fn priority(&self) -> Priority {
        self.task.priority()
    }

    pub fn comments(&self) -> &'a [String] {
        self.task.comments()
    }

    pub fn attachments(&self) -> &'a [String] {
        self.task.attachments()
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    pub fn upload_percent(&self) -> Option<u8> {
        self.upload_percent
    }

    pub fn is_uploading(&self) -> bool {
        self.upload_percent.is_some()
    }
}

/// Resolve the detail view for `selected` on `board`.
pub(crate) fn resolve(
    board: &Board,
    selected: Option<TaskId>,
    upload: FlowStatus,
    upload_target: Option<TaskId>,
) -> Option<TaskDetail<'_>> {
    let task_id = selected?;
    let task = board.task(task_id)?;
    let column = board.locate(task_id)?;
    let upload_percent = if upload_target == Some(task_id) {
        upload.percent()
    } else {
        None
    };
    Some(TaskDetail::new(task, column, upload_percent))
}
