//! Planner - Kanban ボードのアプリケーションコア
//!
//! BoardStore・2 つの進捗フロー・詳細パネルの選択状態をまとめて所有します。
//! ユーザー操作はすべてここを通り、`Result<_, Rejection>` で受理/拒否を返します。
//!
//! # tick の流れ
//! 1. `create_task` / `add_attachment` がフローを開始し OperationId を返す
//! 2. 外側が interval ごとに `tick(kind, op)` を呼ぶ
//! 3. 100% に達したら settle 遅延の後 `settle(kind, op)` を呼ぶ
//! 4. settle でタスク追加・添付追加が確定する

pub mod detail;
pub mod flow;
pub mod simulator;
pub mod snapshot;
pub mod store;

pub use self::detail::TaskDetail;
pub use self::flow::{CreationController, CreationDraft, Flow, UploadController, UploadDraft};
pub use self::simulator::{ProgressSimulator, Tick};
pub use self::snapshot::BoardSnapshot;
pub use self::store::BoardStore;

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::app::config::PlannerConfig;
use crate::domain::{
    Board, BoardEvent, ColumnId, FlowStatus, OperationId, Priority, ProgressKind,
    ProgressProfile, Rejection, TaskId,
};
use crate::ports::{EventSink, IdGenerator};

/// Mutation committed when a flow settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Committed {
    TaskCreated(TaskId),
    AttachmentAdded(TaskId),
}

pub struct Planner {
    store: BoardStore,
    creation: CreationController,
    upload: UploadController,
    selected: Option<TaskId>,
    ids: Arc<dyn IdGenerator>,
    events: Arc<dyn EventSink>,
}

impl Planner {
    pub(crate) fn new(
        config: &PlannerConfig,
        ids: Arc<dyn IdGenerator>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let mut store = BoardStore::new(&config.column_titles, ids.clone());
        for seed in &config.seed_tasks {
            store.seed_task(seed.content.clone(), seed.priority);
        }
        Self {
            store,
            creation: CreationController::new(config.creation),
            upload: UploadController::new(config.upload),
            selected: None,
            ids,
            events,
        }
    }

    // ========================================
    // 読み取り
    // ========================================

    pub fn board(&self) -> &Board {
        self.store.board()
    }

    pub fn completion_percent(&self) -> u8 {
        self.store.completion_percent()
    }

    pub fn status(&self, kind: ProgressKind) -> FlowStatus {
        match kind {
            ProgressKind::TaskCreation => self.creation.flow().status(),
            ProgressKind::FileUpload => self.upload.flow().status(),
        }
    }

    pub fn profile(&self, kind: ProgressKind) -> ProgressProfile {
        match kind {
            ProgressKind::TaskCreation => *self.creation.flow().profile(),
            ProgressKind::FileUpload => *self.upload.flow().profile(),
        }
    }

    pub fn creation(&self) -> &CreationController {
        &self.creation
    }

    pub fn upload(&self) -> &UploadController {
        &self.upload
    }

    pub fn selected(&self) -> Option<TaskId> {
        self.selected
    }

    /// Live view of the selected task, borrowed from the board.
    pub fn detail(&self) -> Option<TaskDetail<'_>> {
        detail::resolve(
            self.store.board(),
            self.selected,
            self.upload.flow().status(),
            self.upload.target(),
        )
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board: self.store.board().clone(),
            completion_percent: self.store.completion_percent(),
            creation: self.creation.flow().status(),
            upload: self.upload.flow().status(),
            upload_target: self.upload.target(),
            create_dialog_open: self.creation.is_dialog_open(),
            selected: self.selected,
        }
    }

    // ========================================
    // 作成フロー
    // ========================================

    pub fn open_create_dialog(&mut self) {
        self.creation.open_dialog();
    }

    pub fn close_create_dialog(&mut self) -> Result<(), Rejection> {
        self.creation
            .close_dialog()
            .inspect_err(|r| debug!(rejection = %r, "close dialog rejected"))
    }

    /// Start a creation. The task is appended to `todo` when the flow settles.
    pub fn create_task(
        &mut self,
        content: impl Into<String>,
        priority: Priority,
    ) -> Result<OperationId, Rejection> {
        let content = content.into();
        if content.trim().is_empty() {
            return self.rejected("create_task", Rejection::EmptyContent);
        }
        let op = self.ids.generate_operation_id();
        if let Err(r) = self
            .creation
            .flow_mut()
            .begin(op, CreationDraft { content, priority })
        {
            return self.rejected("create_task", r);
        }
        self.emit(BoardEvent::ProgressStarted {
            kind: ProgressKind::TaskCreation,
            op,
        });
        Ok(op)
    }

    // ========================================
    // 同期的な変更
    // ========================================

    pub fn move_task(&mut self, task_id: TaskId, from: ColumnId) -> Result<ColumnId, Rejection> {
        match self.store.move_task(task_id, from) {
            Ok(to) => {
                self.emit(BoardEvent::TaskMoved { task_id, from, to });
                Ok(to)
            }
            Err(r) => self.rejected("move_task", r),
        }
    }

    pub fn add_comment(&mut self, task_id: TaskId, text: impl Into<String>) -> Result<(), Rejection> {
        match self.store.add_comment(task_id, text.into()) {
            Ok(index) => {
                self.emit(BoardEvent::CommentAdded { task_id, index });
                Ok(())
            }
            Err(r) => self.rejected("add_comment", r),
        }
    }

    /// Comment box of the detail panel.
    pub fn comment_on_selected(&mut self, text: impl Into<String>) -> Result<(), Rejection> {
        match self.selected {
            Some(task_id) => self.add_comment(task_id, text),
            None => self.rejected("add_comment", Rejection::NoTaskSelected),
        }
    }

    // ========================================
    // アップロードフロー
    // ========================================

    /// Start an upload. Only one upload runs at a time across all tasks, and
    /// the detail panel must be open.
    pub fn add_attachment(
        &mut self,
        task_id: TaskId,
        filename: impl Into<String>,
    ) -> Result<OperationId, Rejection> {
        let filename = filename.into();
        if self.upload.flow().is_busy() {
            return self.rejected("add_attachment", Rejection::UploadInFlight);
        }
        if self.selected.is_none() {
            return self.rejected("add_attachment", Rejection::NoTaskSelected);
        }
        if filename.trim().is_empty() {
            return self.rejected("add_attachment", Rejection::EmptyFilename);
        }
        if !self.store.contains(task_id) {
            return self.rejected("add_attachment", Rejection::task_not_found(task_id));
        }
        let op = self.ids.generate_operation_id();
        if let Err(r) = self
            .upload
            .flow_mut()
            .begin(op, UploadDraft { task_id, filename })
        {
            return self.rejected("add_attachment", r);
        }
        self.emit(BoardEvent::ProgressStarted {
            kind: ProgressKind::FileUpload,
            op,
        });
        Ok(op)
    }

    pub fn attach_to_selected(&mut self, filename: impl Into<String>) -> Result<OperationId, Rejection> {
        match self.selected {
            Some(task_id) => self.add_attachment(task_id, filename),
            None => self.rejected("add_attachment", Rejection::NoTaskSelected),
        }
    }

    // ========================================
    // 詳細パネル
    // ========================================

    pub fn select(&mut self, task_id: TaskId) -> Result<(), Rejection> {
        if !self.store.contains(task_id) {
            return self.rejected("select", Rejection::task_not_found(task_id));
        }
        self.selected = Some(task_id);
        Ok(())
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    // ========================================
    // 進捗シグナル
    // ========================================

    /// Deliver one timer tick to the `kind` flow. Stale ticks return `None`.
    pub fn tick(&mut self, kind: ProgressKind, op: OperationId) -> Option<Tick> {
        let tick = match kind {
            ProgressKind::TaskCreation => self.creation.flow_mut().tick(op),
            ProgressKind::FileUpload => self.upload.flow_mut().tick(op),
        };
        let Some(tick) = tick else {
            trace!(%kind, %op, "stale tick ignored");
            return None;
        };
        self.emit(BoardEvent::ProgressTicked {
            kind,
            op,
            percent: tick.percent,
        });
        if tick.completed {
            self.emit(BoardEvent::ProgressCompleted { kind, op });
        }
        Some(tick)
    }

    /// Commit the settled operation and return the flow to Idle.
    pub fn settle(&mut self, kind: ProgressKind, op: OperationId) -> Option<Committed> {
        let committed = match kind {
            ProgressKind::TaskCreation => {
                let draft = self.creation.settle(op)?;
                let task_id = self.store.insert_task(draft.content, draft.priority);
                self.emit(BoardEvent::TaskCreated {
                    task_id,
                    priority: draft.priority,
                });
                Committed::TaskCreated(task_id)
            }
            ProgressKind::FileUpload => {
                let UploadDraft { task_id, filename } = self.upload.flow_mut().settle(op)?;
                if let Err(r) = self.store.add_attachment(task_id, filename.clone()) {
                    warn!(%task_id, rejection = %r, "upload target vanished");
                    return None;
                }
                self.emit(BoardEvent::AttachmentAdded { task_id, filename });
                Committed::AttachmentAdded(task_id)
            }
        };
        Some(committed)
    }

    fn emit(&self, event: BoardEvent) {
        self.events.emit(&event);
    }

    fn rejected<T>(&self, operation: &'static str, rejection: Rejection) -> Result<T, Rejection> {
        debug!(operation, %rejection, "rejected");
        Err(rejection)
    }
}
