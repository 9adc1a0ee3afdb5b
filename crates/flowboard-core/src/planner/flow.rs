//! Flow controllers - 作成とアップロードの進捗フロー
//!
//! # 状態遷移
//! - Idle -> InProgress(percent) -> Settling -> Idle
//!
//! 実行中の再投入は拒否されます。古い OperationId を持つ tick / settle は無視します。

use crate::domain::{FlowStatus, OperationId, Priority, ProgressKind, ProgressProfile, Rejection, TaskId};

use super::simulator::{ProgressSimulator, Tick};

#[derive(Debug, Clone)]
enum FlowState<P> {
    Idle,
    InProgress { op: OperationId, payload: P },
    Settling { op: OperationId, payload: P },
}

/// One progress flow carrying the payload it will commit on settle.
#[derive(Debug, Clone)]
pub struct Flow<P> {
    kind: ProgressKind,
    simulator: ProgressSimulator,
    state: FlowState<P>,
}

impl<P> Flow<P> {
    pub fn new(kind: ProgressKind, profile: ProgressProfile) -> Self {
        Self {
            kind,
            simulator: ProgressSimulator::new(profile),
            state: FlowState::Idle,
        }
    }

    pub fn kind(&self) -> ProgressKind {
        self.kind
    }

    pub fn profile(&self) -> &ProgressProfile {
        self.simulator.profile()
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.state, FlowState::Idle)
    }

    pub fn status(&self) -> FlowStatus {
        match &self.state {
            FlowState::Idle => FlowStatus::Idle,
            FlowState::InProgress { op, .. } => FlowStatus::InProgress {
                op: *op,
                percent: self.simulator.percent().unwrap_or(0),
            },
            FlowState::Settling { op, .. } => FlowStatus::Settling { op: *op },
        }
    }

    pub fn payload(&self) -> Option<&P> {
        match &self.state {
            FlowState::Idle => None,
            FlowState::InProgress { payload, .. } | FlowState::Settling { payload, .. } => {
                Some(payload)
            }
        }
    }

    /// Idle -> InProgress at 0%.
    pub fn begin(&mut self, op: OperationId, payload: P) -> Result<(), Rejection> {
        if self.is_busy() {
            return Err(Rejection::in_flight(self.kind));
        }
        self.simulator
            .start()
            .map_err(|_| Rejection::in_flight(self.kind))?;
        self.state = FlowState::InProgress { op, payload };
        Ok(())
    }

    /// Advance the running operation `op`. The completing tick moves the flow
    /// to Settling. Returns `None` for a stale or unexpected tick.
    pub fn tick(&mut self, op: OperationId) -> Option<Tick> {
        match &self.state {
            FlowState::InProgress { op: current, .. } if *current == op => {}
            _ => return None,
        }
        let tick = self.simulator.advance()?;
        if tick.completed {
            let state = std::mem::replace(&mut self.state, FlowState::Idle);
            if let FlowState::InProgress { op, payload } = state {
                self.state = FlowState::Settling { op, payload };
            }
        }
        Some(tick)
    }

    /// Settling -> Idle, handing back the payload to commit.
    pub fn settle(&mut self, op: OperationId) -> Option<P> {
        match &self.state {
            FlowState::Settling { op: current, .. } if *current == op => {}
            _ => return None,
        }
        match std::mem::replace(&mut self.state, FlowState::Idle) {
            FlowState::Settling { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Input captured when a creation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationDraft {
    pub content: String,
    pub priority: Priority,
}

/// Creation flow plus the dialog that hosts it.
#[derive(Debug, Clone)]
pub struct CreationController {
    flow: Flow<CreationDraft>,
    dialog_open: bool,
}

impl CreationController {
    pub fn new(profile: ProgressProfile) -> Self {
        Self {
            flow: Flow::new(ProgressKind::TaskCreation, profile),
            dialog_open: false,
        }
    }

    pub fn flow(&self) -> &Flow<CreationDraft> {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut Flow<CreationDraft> {
        &mut self.flow
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    /// Inputs are read-only while a creation runs.
    pub fn is_input_locked(&self) -> bool {
        self.flow.is_busy()
    }

    pub fn open_dialog(&mut self) {
        self.dialog_open = true;
    }

    /// The dialog cannot be dismissed mid-creation.
    pub fn close_dialog(&mut self) -> Result<(), Rejection> {
        if self.flow.is_busy() {
            return Err(Rejection::CreationInFlight);
        }
        self.dialog_open = false;
        Ok(())
    }

    pub fn settle(&mut self, op: OperationId) -> Option<CreationDraft> {
        let draft = self.flow.settle(op)?;
        self.dialog_open = false;
        Some(draft)
    }
}

/// Target captured when an upload starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDraft {
    pub task_id: TaskId,
    pub filename: String,
}

/// Upload flow. The picked file is held only while the upload runs.
#[derive(Debug, Clone)]
pub struct UploadController {
    flow: Flow<UploadDraft>,
}

impl UploadController {
    pub fn new(profile: ProgressProfile) -> Self {
        Self {
            flow: Flow::new(ProgressKind::FileUpload, profile),
        }
    }

    pub fn flow(&self) -> &Flow<UploadDraft> {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut Flow<UploadDraft> {
        &mut self.flow
    }

    pub fn picked_file(&self) -> Option<&str> {
        self.flow.payload().map(|d| d.filename.as_str())
    }

    /// Task the running upload will attach to.
    pub fn target(&self) -> Option<TaskId> {
        self.flow.payload().map(|d| d.task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn op() -> OperationId {
        OperationId::from_ulid(Ulid::new())
    }

    fn draft(content: &str) -> CreationDraft {
        CreationDraft {
            content: content.to_string(),
            priority: Priority::High,
        }
    }

    fn tick_until_settling<P>(flow: &mut Flow<P>, op: OperationId) -> Vec<u8> {
        let mut seen = Vec::new();
        while let Some(tick) = flow.tick(op) {
            seen.push(tick.percent);
        }
        seen
    }

    #[test]
    fn flow_walks_idle_in_progress_settling_idle() {
        let mut flow = Flow::new(ProgressKind::TaskCreation, ProgressProfile::task_creation());
        let id = op();
        assert_eq!(flow.status(), FlowStatus::Idle);

        flow.begin(id, draft("a")).unwrap();
        assert_eq!(flow.status(), FlowStatus::InProgress { op: id, percent: 0 });

        assert_eq!(tick_until_settling(&mut flow, id), vec![20, 40, 60, 80, 100]);
        assert_eq!(flow.status(), FlowStatus::Settling { op: id });

        assert_eq!(flow.settle(id), Some(draft("a")));
        assert_eq!(flow.status(), FlowStatus::Idle);
    }

    #[test]
    fn second_begin_is_rejected_and_keeps_first() {
        let mut flow = Flow::new(ProgressKind::TaskCreation, ProgressProfile::task_creation());
        let first = op();
        flow.begin(first, draft("first")).unwrap();
        flow.tick(first);

        assert_eq!(flow.begin(op(), draft("second")), Err(Rejection::CreationInFlight));
        assert_eq!(flow.status(), FlowStatus::InProgress { op: first, percent: 20 });
        assert_eq!(flow.payload(), Some(&draft("first")));
    }

    #[test]
    fn begin_is_rejected_while_settling() {
        let mut flow = Flow::new(ProgressKind::FileUpload, ProgressProfile::file_upload());
        let id = op();
        flow.begin(id, ()).unwrap();
        tick_until_settling(&mut flow, id);

        assert_eq!(flow.begin(op(), ()), Err(Rejection::UploadInFlight));
    }

    #[test]
    fn stale_signals_are_ignored() {
        let mut flow = Flow::new(ProgressKind::FileUpload, ProgressProfile::file_upload());
        let id = op();
        let stale = op();
        flow.begin(id, ()).unwrap();

        assert_eq!(flow.tick(stale), None);
        assert_eq!(flow.settle(id), None);
        assert_eq!(flow.status(), FlowStatus::InProgress { op: id, percent: 0 });

        tick_until_settling(&mut flow, id);
        assert_eq!(flow.settle(stale), None);
        assert_eq!(flow.settle(id), Some(()));
    }

    #[test]
    fn creation_dialog_stays_open_while_busy() {
        let mut creation = CreationController::new(ProgressProfile::task_creation());
        creation.open_dialog();
        let id = op();
        creation.flow_mut().begin(id, draft("x")).unwrap();

        assert!(creation.is_input_locked());
        assert_eq!(creation.close_dialog(), Err(Rejection::CreationInFlight));
        assert!(creation.is_dialog_open());

        tick_until_settling(creation.flow_mut(), id);
        assert!(creation.settle(id).is_some());
        assert!(!creation.is_dialog_open());
        assert!(!creation.is_input_locked());
    }

    #[test]
    fn upload_clears_picked_file_on_settle() {
        let mut upload = UploadController::new(ProgressProfile::file_upload());
        let task_id = TaskId::from_ulid(Ulid::new());
        let id = op();
        upload
            .flow_mut()
            .begin(
                id,
                UploadDraft {
                    task_id,
                    filename: "spec.pdf".into(),
                },
            )
            .unwrap();
        assert_eq!(upload.picked_file(), Some("spec.pdf"));
        assert_eq!(upload.target(), Some(task_id));

        tick_until_settling(upload.flow_mut(), id);
        upload.flow_mut().settle(id);
        assert_eq!(upload.picked_file(), None);
    }
}
