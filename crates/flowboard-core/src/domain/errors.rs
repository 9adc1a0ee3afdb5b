//! Errors - 操作の拒否理由
//!
//! Board への操作はすべて `Result<T, Rejection>` を返します。
//! 拒否された操作は状態を一切変更しません。

use thiserror::Error;

use super::{ColumnId, ProgressKind, TaskId};

/// Rejection は受け付けられなかった操作の理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("task content must not be empty")]
    EmptyContent,

    #[error("comment text must not be empty")]
    EmptyComment,

    #[error("attachment filename must not be empty")]
    EmptyFilename,

    #[error("a task creation is already in progress")]
    CreationInFlight,

    #[error("a file upload is already in progress")]
    UploadInFlight,

    #[error("no task is selected")]
    NoTaskSelected,

    #[error("task {task_id} not found{}", .column.map(|c| format!(" in column {c}")).unwrap_or_default())]
    TaskNotFound {
        task_id: TaskId,
        column: Option<ColumnId>,
    },

    #[error("column {0} is the last column")]
    NoNextColumn(ColumnId),

    #[error("unknown column id '{0}'")]
    UnknownColumn(String),

    #[error("unknown priority '{0}'")]
    UnknownPriority(String),
}

impl Rejection {
    /// The "already running" rejection for a progress kind.
    pub fn in_flight(kind: ProgressKind) -> Self {
        match kind {
            ProgressKind::TaskCreation => Rejection::CreationInFlight,
            ProgressKind::FileUpload => Rejection::UploadInFlight,
        }
    }

    pub(crate) fn task_not_found(task_id: TaskId) -> Self {
        Rejection::TaskNotFound {
            task_id,
            column: None,
        }
    }
}
