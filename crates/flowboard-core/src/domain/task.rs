use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TaskId;
use super::errors::Rejection;

/// Task priority, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Rejection::UnknownPriority(s.to_string())),
        }
    }
}

/// A unit of work on the board.
///
/// `comments` and `attachments` are append-only; the only way to grow them is
/// through the board store so that every holder sees the same sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    content: String,
    priority: Priority,
    comments: Vec<String>,
    attachments: Vec<String>,
}

impl Task {
    pub fn new(id: TaskId, content: impl Into<String>, priority: Priority) -> Self {
        Self {
            id,
            content: content.into(),
            priority,
            comments: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    pub(crate) fn push_comment(&mut self, text: String) {
        self.comments.push(text);
    }

    pub(crate) fn push_attachment(&mut self, filename: String) {
        self.attachments.push(filename);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use ulid::Ulid;

    #[test]
    fn new_task_has_empty_feeds() {
        let task = Task::new(TaskId::from_ulid(Ulid::new()), "Fix bug", Priority::High);
        assert_eq!(task.content(), "Fix bug");
        assert_eq!(task.priority(), Priority::High);
        assert!(task.comments().is_empty());
        assert!(task.attachments().is_empty());
    }

    #[rstest]
    #[case::low("low", Priority::Low)]
    #[case::medium("Medium", Priority::Medium)]
    #[case::high(" HIGH ", Priority::High)]
    fn priority_parses_case_insensitively(#[case] input: &str, #[case] expected: Priority) {
        assert_eq!(input.parse::<Priority>().unwrap(), expected);
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let result = "urgent".parse::<Priority>();
        assert!(matches!(result, Err(Rejection::UnknownPriority(p)) if p == "urgent"));
    }

    #[test]
    fn feeds_keep_insertion_order() {
        let mut task = Task::new(TaskId::from_ulid(Ulid::new()), "x", Priority::Low);
        task.push_comment("first".into());
        task.push_comment("second".into());
        task.push_attachment("a.pdf".into());

        assert_eq!(task.comments(), ["first", "second"]);
        assert_eq!(task.attachments(), ["a.pdf"]);
    }
}
