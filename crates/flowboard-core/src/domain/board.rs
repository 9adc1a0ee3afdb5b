//! Board - 3 つの固定カラムとそのタスク
//!
//! Board は値型です。snapshot として clone して配布できます。

use std::collections::HashSet;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::column::{Column, ColumnId, ColumnTitles};
use super::errors::Rejection;
use super::task::Task;
use super::TaskId;

/// The complete Kanban state: todo, doing and done, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    columns: [Column; 3],
}

/// 外部から渡された columns が Board の形を満たさない
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidBoard {
    #[error("expected column {expected} at position {position}, found {found}")]
    MisorderedColumn {
        position: usize,
        expected: ColumnId,
        found: ColumnId,
    },

    #[error("task {0} appears more than once")]
    DuplicateTask(TaskId),
}

impl Board {
    pub fn new(titles: &ColumnTitles) -> Self {
        Self {
            columns: ColumnId::ALL.map(|id| Column::new(id, titles.get(id))),
        }
    }

    /// Rebuild a board from columns, checking order and task-id uniqueness.
    pub fn from_columns(columns: [Column; 3]) -> Result<Self, InvalidBoard> {
        for (position, (column, expected)) in columns.iter().zip(ColumnId::ALL).enumerate() {
            if column.id() != expected {
                return Err(InvalidBoard::MisorderedColumn {
                    position,
                    expected,
                    found: column.id(),
                });
            }
        }
        let board = Self { columns };
        match board.first_duplicate() {
            Some(task_id) => Err(InvalidBoard::DuplicateTask(task_id)),
            None => Ok(board),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.index()]
    }

    pub fn total_tasks(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Share of tasks in `done`, rounded half-up to a whole percent.
    pub fn completion_percent(&self) -> u8 {
        let total = self.total_tasks();
        if total == 0 {
            return 0;
        }
        let done = self.column(ColumnId::Done).len();
        ((200 * done + total) / (2 * total)) as u8
    }

    /// Column currently holding `task_id`.
    pub fn locate(&self, task_id: TaskId) -> Option<ColumnId> {
        self.columns
            .iter()
            .find(|c| c.tasks().iter().any(|t| t.id() == task_id))
            .map(Column::id)
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.columns
            .iter()
            .flat_map(|c| c.tasks())
            .find(|t| t.id() == task_id)
    }

    pub(crate) fn task_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.columns
            .iter_mut()
            .flat_map(|c| c.tasks_mut().iter_mut())
            .find(|t| t.id() == task_id)
    }

    pub(crate) fn push(&mut self, column: ColumnId, task: Task) {
        self.columns[column.index()].tasks_mut().push(task);
    }

    /// Move `task_id` from `from` to the next column.
    ///
    /// The task value is removed and re-appended within one `&mut` borrow, so
    /// no observer can see it in two columns.
    pub(crate) fn relocate(&mut self, task_id: TaskId, from: ColumnId) -> Result<ColumnId, Rejection> {
        let to = from.next().ok_or(Rejection::NoNextColumn(from))?;
        let source = self.columns[from.index()].tasks_mut();
        let pos = source
            .iter()
            .position(|t| t.id() == task_id)
            .ok_or(Rejection::TaskNotFound {
                task_id,
                column: Some(from),
            })?;
        let task = source.remove(pos);
        self.push(to, task);
        Ok(to)
    }

    /// Every task id appears in exactly one column.
    pub fn is_consistent(&self) -> bool {
        self.first_duplicate().is_none()
    }

    fn first_duplicate(&self) -> Option<TaskId> {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .flat_map(|c| c.tasks())
            .map(Task::id)
            .find(|id| !seen.insert(*id))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            columns: [Column; 3],
        }

        let raw = Raw::deserialize(deserializer)?;
        Board::from_columns(raw.columns).map_err(D::Error::custom)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(&ColumnTitles::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use rstest::rstest;
    use ulid::Ulid;

    fn task(content: &str) -> Task {
        Task::new(TaskId::from_ulid(Ulid::new()), content, Priority::Medium)
    }

    fn board_with(todo: usize, doing: usize, done: usize) -> Board {
        let mut board = Board::default();
        for (column, n) in [(ColumnId::Todo, todo), (ColumnId::Doing, doing), (ColumnId::Done, done)] {
            for i in 0..n {
                board.push(column, task(&format!("{column}-{i}")));
            }
        }
        board
    }

    #[test]
    fn new_board_has_three_empty_columns_in_order() {
        let board = Board::default();
        let ids: Vec<_> = board.columns().iter().map(Column::id).collect();
        assert_eq!(ids, ColumnId::ALL);
        assert_eq!(board.total_tasks(), 0);
        assert_eq!(board.column(ColumnId::Todo).title(), "Project Backlog");
    }

    #[rstest]
    #[case::empty(0, 0, 0, 0)]
    #[case::one_of_three(1, 1, 1, 33)]
    #[case::two_of_three(1, 0, 2, 67)]
    #[case::half(1, 0, 1, 50)]
    #[case::all_done(0, 0, 4, 100)]
    #[case::none_done(2, 3, 0, 0)]
    #[case::one_of_eight(7, 0, 1, 13)]
    fn completion_percent_rounds_to_nearest(
        #[case] todo: usize,
        #[case] doing: usize,
        #[case] done: usize,
        #[case] expected: u8,
    ) {
        assert_eq!(board_with(todo, doing, done).completion_percent(), expected);
    }

    #[test]
    fn relocate_moves_task_value_to_next_column() {
        let mut board = Board::default();
        let mut t = task("Fix bug");
        t.push_comment("keep me".into());
        let id = t.id();
        board.push(ColumnId::Todo, t.clone());

        assert_eq!(board.relocate(id, ColumnId::Todo), Ok(ColumnId::Doing));
        assert!(board.column(ColumnId::Todo).is_empty());
        assert_eq!(board.column(ColumnId::Doing).tasks(), [t]);
        assert_eq!(board.locate(id), Some(ColumnId::Doing));
        assert!(board.is_consistent());
    }

    #[test]
    fn relocate_from_done_is_rejected() {
        let mut board = board_with(0, 0, 1);
        let id = board.column(ColumnId::Done).tasks()[0].id();
        let before = board.clone();

        assert_eq!(
            board.relocate(id, ColumnId::Done),
            Err(Rejection::NoNextColumn(ColumnId::Done))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn relocate_with_wrong_source_column_is_rejected() {
        let mut board = board_with(1, 0, 0);
        let id = board.column(ColumnId::Todo).tasks()[0].id();
        let before = board.clone();

        assert_eq!(
            board.relocate(id, ColumnId::Doing),
            Err(Rejection::TaskNotFound {
                task_id: id,
                column: Some(ColumnId::Doing)
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn duplicate_ids_are_detected() {
        let mut board = Board::default();
        let t = task("dup");
        board.push(ColumnId::Todo, t.clone());
        assert!(board.is_consistent());
        board.push(ColumnId::Done, t);
        assert!(!board.is_consistent());
    }

    #[test]
    fn deserialize_accepts_a_serialized_board() {
        let board = board_with(1, 1, 1);
        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn deserialize_rejects_misordered_columns() {
        let json = r#"{ "columns": [
            { "id": "done", "title": "Finished", "tasks": [] },
            { "id": "done", "title": "Finished", "tasks": [] },
            { "id": "todo", "title": "Project Backlog", "tasks": [] }
        ] }"#;
        let err = serde_json::from_str::<Board>(json).unwrap_err();
        assert!(err.to_string().contains("expected column todo at position 0"), "{err}");
    }

    #[test]
    fn from_columns_rejects_a_task_in_two_columns() {
        let t = task("dup");
        let [mut todo, doing, mut done] = Board::default().columns;
        todo.tasks_mut().push(t.clone());
        done.tasks_mut().push(t.clone());

        assert_eq!(
            Board::from_columns([todo, doing, done]),
            Err(InvalidBoard::DuplicateTask(t.id()))
        );
    }

    #[test]
    fn task_mut_reaches_any_column() {
        let mut board = board_with(0, 1, 0);
        let id = board.column(ColumnId::Doing).tasks()[0].id();

        board.task_mut(id).unwrap().push_comment("ok".into());
        assert_eq!(board.task(id).unwrap().comments(), ["ok"]);
    }
}
