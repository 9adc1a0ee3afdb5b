//! BoardStore - Board の唯一の所有者
//!
//! Board への変更はすべてここを通ります。各メソッドは `&mut self` の中で
//! 完結するので、途中状態が外から見えることはありません。

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{Board, ColumnId, ColumnTitles, Priority, Rejection, Task, TaskId};
use crate::ports::IdGenerator;

pub struct BoardStore {
    board: Board,
    ids: Arc<dyn IdGenerator>,
}

impl BoardStore {
    pub fn new(titles: &ColumnTitles, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            board: Board::new(titles),
            ids,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn completion_percent(&self) -> u8 {
        self.board.completion_percent()
    }

    /// Append a new task to `todo`. Content was validated when the creation began.
    pub fn insert_task(&mut self, content: String, priority: Priority) -> TaskId {
        let task_id = self.append(content, priority);
        info!(%task_id, %priority, "task created");
        task_id
    }

    /// 初期タスクの投入。作成操作ではないので debug で残すだけ
    pub fn seed_task(&mut self, content: String, priority: Priority) -> TaskId {
        let task_id = self.append(content, priority);
        debug!(%task_id, %priority, "task seeded");
        task_id
    }

    fn append(&mut self, content: String, priority: Priority) -> TaskId {
        let task_id = self.ids.generate_task_id();
        self.board
            .push(ColumnId::Todo, Task::new(task_id, content, priority));
        task_id
    }

    pub fn move_task(&mut self, task_id: TaskId, from: ColumnId) -> Result<ColumnId, Rejection> {
        let to = self.board.relocate(task_id, from)?;
        info!(%task_id, %from, %to, "task moved");
        Ok(to)
    }

    /// Append `text` to the task's comments, returning its index.
    pub fn add_comment(&mut self, task_id: TaskId, text: String) -> Result<usize, Rejection> {
        if text.trim().is_empty() {
            return Err(Rejection::EmptyComment);
        }
        let task = self
            .board
            .task_mut(task_id)
            .ok_or(Rejection::task_not_found(task_id))?;
        task.push_comment(text);
        Ok(task.comments().len() - 1)
    }

    pub fn add_attachment(&mut self, task_id: TaskId, filename: String) -> Result<(), Rejection> {
        let task = self
            .board
            .task_mut(task_id)
            .ok_or(Rejection::task_not_found(task_id))?;
        info!(%task_id, %filename, "attachment added");
        task.push_attachment(filename);
        Ok(())
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        self.board.task(task_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{SystemClock, UlidGenerator};

    fn store() -> BoardStore {
        BoardStore::new(
            &ColumnTitles::default(),
            Arc::new(UlidGenerator::new(SystemClock)),
        )
    }

    #[test]
    fn inserted_tasks_append_to_todo_in_order() {
        let mut store = store();
        let a = store.insert_task("a".into(), Priority::Low);
        let b = store.insert_task("b".into(), Priority::High);

        let ids: Vec<_> = store
            .board()
            .column(ColumnId::Todo)
            .tasks()
            .iter()
            .map(Task::id)
            .collect();
        assert_eq!(ids, vec![a, b]);
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_tasks_share_the_todo_order_with_created_ones() {
        let mut store = store();
        let seeded = store.seed_task("seed".into(), Priority::High);
        let created = store.insert_task("new".into(), Priority::Low);

        let todo = store.board().column(ColumnId::Todo).tasks();
        assert_eq!(todo[0].id(), seeded);
        assert_eq!(todo[0].priority(), Priority::High);
        assert_eq!(todo[1].id(), created);
    }

    #[test]
    fn moving_never_changes_total_or_duplicates() {
        let mut store = store();
        let ids: Vec<_> = (0..4)
            .map(|i| store.insert_task(format!("t{i}"), Priority::Medium))
            .collect();

        store.move_task(ids[0], ColumnId::Todo).unwrap();
        store.move_task(ids[0], ColumnId::Doing).unwrap();
        store.move_task(ids[1], ColumnId::Todo).unwrap();
        let _ = store.move_task(ids[0], ColumnId::Done);
        let _ = store.move_task(ids[2], ColumnId::Doing);

        assert_eq!(store.board().total_tasks(), 4);
        assert!(store.board().is_consistent());
        assert_eq!(store.board().locate(ids[0]), Some(ColumnId::Done));
        assert_eq!(store.board().locate(ids[1]), Some(ColumnId::Doing));
        assert_eq!(store.board().locate(ids[2]), Some(ColumnId::Todo));
        assert_eq!(store.completion_percent(), 25);
    }

    #[test]
    fn empty_comment_leaves_comments_unchanged() {
        let mut store = store();
        let id = store.insert_task("t".into(), Priority::Low);

        assert_eq!(store.add_comment(id, String::new()), Err(Rejection::EmptyComment));
        assert_eq!(store.add_comment(id, "   ".into()), Err(Rejection::EmptyComment));
        assert!(store.board().task(id).unwrap().comments().is_empty());

        assert_eq!(store.add_comment(id, "ok".into()), Ok(0));
        assert_eq!(store.board().task(id).unwrap().comments(), ["ok"]);
    }

    #[test]
    fn comment_follows_task_across_columns() {
        let mut store = store();
        let id = store.insert_task("t".into(), Priority::Low);
        store.add_comment(id, "before".into()).unwrap();
        store.move_task(id, ColumnId::Todo).unwrap();
        store.add_comment(id, "after".into()).unwrap();

        let task = &store.board().column(ColumnId::Doing).tasks()[0];
        assert_eq!(task.comments(), ["before", "after"]);
    }

    #[test]
    fn unknown_task_is_rejected() {
        let mut store = store();
        let ghost = UlidGenerator::new(SystemClock).generate_task_id();

        assert_eq!(
            store.add_comment(ghost, "hi".into()),
            Err(Rejection::task_not_found(ghost))
        );
        assert_eq!(
            store.add_attachment(ghost, "a.txt".into()),
            Err(Rejection::task_not_found(ghost))
        );
        assert!(!store.contains(ghost));
    }
}
