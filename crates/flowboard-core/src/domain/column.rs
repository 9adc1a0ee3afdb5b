//! Column - 固定された 3 つのステージ
//!
//! # 状態遷移
//! - todo -> doing -> done（一方向のみ、逆戻りなし）

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::Rejection;
use super::task::Task;

/// Column identifier (closed, ordered set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Todo,
    Doing,
    Done,
}

impl ColumnId {
    /// Board order.
    pub const ALL: [ColumnId; 3] = [ColumnId::Todo, ColumnId::Doing, ColumnId::Done];

    /// The column a task moves to next, if any.
    pub fn next(self) -> Option<ColumnId> {
        match self {
            ColumnId::Todo => Some(ColumnId::Doing),
            ColumnId::Doing => Some(ColumnId::Done),
            ColumnId::Done => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnId::Todo => "todo",
            ColumnId::Doing => "doing",
            ColumnId::Done => "done",
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnId {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(ColumnId::Todo),
            "doing" => Ok(ColumnId::Doing),
            "done" => Ok(ColumnId::Done),
            other => Err(Rejection::UnknownColumn(other.to_string())),
        }
    }
}

/// Display labels for the three columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnTitles {
    pub todo: String,
    pub doing: String,
    pub done: String,
}

impl ColumnTitles {
    pub fn get(&self, id: ColumnId) -> &str {
        match id {
            ColumnId::Todo => &self.todo,
            ColumnId::Doing => &self.doing,
            ColumnId::Done => &self.done,
        }
    }
}

impl Default for ColumnTitles {
    fn default() -> Self {
        Self {
            todo: "Project Backlog".to_string(),
            doing: "In Development".to_string(),
            done: "Finished".to_string(),
        }
    }
}

/// One stage of the board and the tasks currently in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    title: String,
    tasks: Vec<Task>,
}

impl Column {
    pub fn new(id: ColumnId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }
}
