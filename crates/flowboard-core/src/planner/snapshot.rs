//! BoardSnapshot - ホスト側の描画用に配布する不変スナップショット

use serde::Serialize;

use crate::domain::{Board, Column, ColumnId, FlowStatus, TaskId};

use super::detail::{self, TaskDetail};

/// Everything a view layer needs to render the board at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub board: Board,
    pub completion_percent: u8,
    pub creation: FlowStatus,
    pub upload: FlowStatus,
    pub upload_target: Option<TaskId>,
    pub create_dialog_open: bool,
    pub selected: Option<TaskId>,
}

impl BoardSnapshot {
    pub fn column(&self, id: ColumnId) -> &Column {
        self.board.column(id)
    }

    pub fn detail(&self) -> Option<TaskDetail<'_>> {
        detail::resolve(&self.board, self.selected, self.upload, self.upload_target)
    }
}

#[cfg(test)]
mod tests {
    use crate::app::PlannerBuilder;
    use crate::domain::{Priority, ProgressKind};

    #[test]
    fn snapshot_is_detached_from_later_changes() {
        let mut planner = PlannerBuilder::new().build().unwrap();
        let op = planner.create_task("t", Priority::Low).unwrap();
        planner.tick(ProgressKind::TaskCreation, op);

        let snapshot = planner.snapshot();
        assert_eq!(snapshot.creation.percent(), Some(20));

        while planner.tick(ProgressKind::TaskCreation, op).is_some() {}
        planner.settle(ProgressKind::TaskCreation, op);

        assert_eq!(snapshot.board.total_tasks(), 0);
        assert_eq!(planner.snapshot().board.total_tasks(), 1);
    }

    #[test]
    fn snapshot_serializes_flow_state() {
        let mut planner = PlannerBuilder::new().build().unwrap();
        planner.create_task("t", Priority::Low).unwrap();

        let json = serde_json::to_value(planner.snapshot()).unwrap();
        assert_eq!(json["creation"]["state"], "in_progress");
        assert_eq!(json["creation"]["percent"], 0);
        assert_eq!(json["upload"]["state"], "idle");
        assert_eq!(json["completion_percent"], 0);
    }
}
