//! BoardRuntime - Planner を 1 つの tokio タスクで所有するアクター
//!
//! # 学習ポイント
//! - mpsc + oneshot によるリクエスト/レスポンス
//! - watch による最新スナップショットの配布
//! - タイマータスクは tick をコマンドと同じループへ送るだけ
//!
//! Planner を触るのはアクターのループだけなので、操作と tick が同時に
//! 走ることはありません。

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::{ColumnId, OperationId, Priority, ProgressKind, Rejection, TaskId};
use crate::planner::{BoardSnapshot, Committed, Planner};
use crate::ports::Ticker;

const COMMAND_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("board runtime has stopped")]
    Stopped,
}

/// Either the planner refused the command, or nobody was there to run it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

type Reply<T> = oneshot::Sender<Result<T, Rejection>>;

enum Command {
    CreateTask {
        content: String,
        priority: Priority,
        reply: Reply<OperationId>,
    },
    MoveTask {
        task_id: TaskId,
        from: ColumnId,
        reply: Reply<ColumnId>,
    },
    AddComment {
        task_id: TaskId,
        text: String,
        reply: Reply<()>,
    },
    CommentOnSelected {
        text: String,
        reply: Reply<()>,
    },
    AddAttachment {
        task_id: TaskId,
        filename: String,
        reply: Reply<OperationId>,
    },
    AttachToSelected {
        filename: String,
        reply: Reply<OperationId>,
    },
    Select {
        task_id: TaskId,
        reply: Reply<()>,
    },
    CloseDetail {
        reply: Reply<()>,
    },
    OpenCreateDialog {
        reply: Reply<()>,
    },
    CloseCreateDialog {
        reply: Reply<()>,
    },
}

/// Timer output, fed back into the actor loop.
#[derive(Debug, Clone, Copy)]
enum Signal {
    Tick { kind: ProgressKind, op: OperationId },
    Settle { kind: ProgressKind, op: OperationId },
}

pub struct BoardRuntime {
    planner: Planner,
    ticker: Arc<dyn Ticker>,
    signal_tx: mpsc::UnboundedSender<Signal>,
    signal_rx: mpsc::UnboundedReceiver<Signal>,
}

impl BoardRuntime {
    pub fn new(planner: Planner, ticker: Arc<dyn Ticker>) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        Self {
            planner,
            ticker,
            signal_tx,
            signal_rx,
        }
    }

    /// Start the actor. It runs until every `BoardHandle` is dropped and then
    /// hands the planner back through the join handle.
    pub fn spawn(self) -> (BoardHandle, JoinHandle<Planner>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(self.planner.snapshot()));
        let join = tokio::spawn(self.run(command_rx, snapshot_tx));
        let handle = BoardHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (handle, join)
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        snapshots: watch::Sender<Arc<BoardSnapshot>>,
    ) -> Planner {
        info!("board runtime started");
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(signal) = self.signal_rx.recv() => self.handle_signal(signal),
            }
            snapshots.send_replace(Arc::new(self.planner.snapshot()));
        }
        info!("board runtime stopped");
        self.planner
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::CreateTask {
                content,
                priority,
                reply,
            } => {
                let result = self.planner.create_task(content, priority);
                if let Ok(op) = result {
                    self.start_timer(ProgressKind::TaskCreation, op);
                }
                let _ = reply.send(result);
            }
            Command::MoveTask {
                task_id,
                from,
                reply,
            } => {
                let _ = reply.send(self.planner.move_task(task_id, from));
            }
            Command::AddComment {
                task_id,
                text,
                reply,
            } => {
                let _ = reply.send(self.planner.add_comment(task_id, text));
            }
            Command::CommentOnSelected { text, reply } => {
                let _ = reply.send(self.planner.comment_on_selected(text));
            }
            Command::AddAttachment {
                task_id,
                filename,
                reply,
            } => {
                let result = self.planner.add_attachment(task_id, filename);
                if let Ok(op) = result {
                    self.start_timer(ProgressKind::FileUpload, op);
                }
                let _ = reply.send(result);
            }
            Command::AttachToSelected { filename, reply } => {
                let result = self.planner.attach_to_selected(filename);
                if let Ok(op) = result {
                    self.start_timer(ProgressKind::FileUpload, op);
                }
                let _ = reply.send(result);
            }
            Command::Select { task_id, reply } => {
                let _ = reply.send(self.planner.select(task_id));
            }
            Command::CloseDetail { reply } => {
                self.planner.close_detail();
                let _ = reply.send(Ok(()));
            }
            Command::OpenCreateDialog { reply } => {
                self.planner.open_create_dialog();
                let _ = reply.send(Ok(()));
            }
            Command::CloseCreateDialog { reply } => {
                let _ = reply.send(self.planner.close_create_dialog());
            }
        }
    }

    fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Tick { kind, op } => {
                self.planner.tick(kind, op);
            }
            Signal::Settle { kind, op } => match self.planner.settle(kind, op) {
                Some(Committed::TaskCreated(task_id)) => debug!(%op, %task_id, "creation settled"),
                Some(Committed::AttachmentAdded(task_id)) => debug!(%op, %task_id, "upload settled"),
                None => debug!(%kind, %op, "settle ignored"),
            },
        }
    }

    /// Spawn the timer for `op`: one tick per interval until 100%, then settle.
    fn start_timer(&self, kind: ProgressKind, op: OperationId) {
        let profile = self.planner.profile(kind);
        let ticker = self.ticker.clone();
        let signals = self.signal_tx.clone();
        tokio::spawn(async move {
            for _ in 0..profile.ticks_to_complete() {
                ticker.wait(profile.interval).await;
                if signals.send(Signal::Tick { kind, op }).is_err() {
                    return;
                }
            }
            if !profile.settle.is_zero() {
                ticker.wait(profile.settle).await;
            }
            let _ = signals.send(Signal::Settle { kind, op });
        });
    }
}

/// Cloneable entry point for the host view layer.
#[derive(Clone)]
pub struct BoardHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<BoardSnapshot>>,
}

impl BoardHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, CommandError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        let result = response.await.map_err(|_| RuntimeError::Stopped)?;
        Ok(result?)
    }

    pub async fn create_task(
        &self,
        content: impl Into<String>,
        priority: Priority,
    ) -> Result<OperationId, CommandError> {
        let content = content.into();
        self.request(|reply| Command::CreateTask {
            content,
            priority,
            reply,
        })
        .await
    }

    pub async fn move_task(&self, task_id: TaskId, from: ColumnId) -> Result<ColumnId, CommandError> {
        self.request(|reply| Command::MoveTask {
            task_id,
            from,
            reply,
        })
        .await
    }

    pub async fn add_comment(&self, task_id: TaskId, text: impl Into<String>) -> Result<(), CommandError> {
        let text = text.into();
        self.request(|reply| Command::AddComment {
            task_id,
            text,
            reply,
        })
        .await
    }

    pub async fn comment_on_selected(&self, text: impl Into<String>) -> Result<(), CommandError> {
        let text = text.into();
        self.request(|reply| Command::CommentOnSelected { text, reply })
            .await
    }

    pub async fn add_attachment(
        &self,
        task_id: TaskId,
        filename: impl Into<String>,
    ) -> Result<OperationId, CommandError> {
        let filename = filename.into();
        self.request(|reply| Command::AddAttachment {
            task_id,
            filename,
            reply,
        })
        .await
    }

    pub async fn attach_to_selected(&self, filename: impl Into<String>) -> Result<OperationId, CommandError> {
        let filename = filename.into();
        self.request(|reply| Command::AttachToSelected { filename, reply })
            .await
    }

    pub async fn select(&self, task_id: TaskId) -> Result<(), CommandError> {
        self.request(|reply| Command::Select { task_id, reply }).await
    }

    pub async fn close_detail(&self) -> Result<(), CommandError> {
        self.request(|reply| Command::CloseDetail { reply }).await
    }

    pub async fn open_create_dialog(&self) -> Result<(), CommandError> {
        self.request(|reply| Command::OpenCreateDialog { reply }).await
    }

    pub async fn close_create_dialog(&self) -> Result<(), CommandError> {
        self.request(|reply| Command::CloseCreateDialog { reply }).await
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.snapshots.clone()
    }

    /// Wait for the first snapshot (current one included) matching `predicate`.
    pub async fn wait_until(
        &self,
        mut predicate: impl FnMut(&BoardSnapshot) -> bool,
    ) -> Result<Arc<BoardSnapshot>, RuntimeError> {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(|s| predicate(&**s))
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        Ok(snapshot.clone())
    }
}
