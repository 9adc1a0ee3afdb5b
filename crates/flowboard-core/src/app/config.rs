//! PlannerConfig - 進捗プロファイル・カラム名・初期タスク
//!
//! JSON から読み込めます。省略したフィールドはデフォルト値になります。

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ColumnId, ColumnTitles, Priority, ProgressKind, ProgressProfile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{kind} increment must be between 1 and 100, got {increment}")]
    InvalidIncrement { kind: ProgressKind, increment: u8 },

    #[error("{0} tick interval must be greater than zero")]
    ZeroInterval(ProgressKind),

    #[error("title of column {0} must not be empty")]
    EmptyColumnTitle(ColumnId),

    #[error("seed task #{0} has empty content")]
    EmptySeedContent(usize),
}

/// A task placed in `todo` when the board is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTask {
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub creation: ProgressProfile,
    pub upload: ProgressProfile,
    pub column_titles: ColumnTitles,
    pub seed_tasks: Vec<SeedTask>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            creation: ProgressProfile::task_creation(),
            upload: ProgressProfile::file_upload(),
            column_titles: ColumnTitles::default(),
            seed_tasks: Vec::new(),
        }
    }
}

impl PlannerConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, profile) in [
            (ProgressKind::TaskCreation, &self.creation),
            (ProgressKind::FileUpload, &self.upload),
        ] {
            if profile.increment == 0 || profile.increment > 100 {
                return Err(ConfigError::InvalidIncrement {
                    kind,
                    increment: profile.increment,
                });
            }
            if profile.interval.is_zero() {
                return Err(ConfigError::ZeroInterval(kind));
            }
        }
        for id in ColumnId::ALL {
            if self.column_titles.get(id).trim().is_empty() {
                return Err(ConfigError::EmptyColumnTitle(id));
            }
        }
        if let Some(i) = self
            .seed_tasks
            .iter()
            .position(|seed| seed.content.trim().is_empty())
        {
            return Err(ConfigError::EmptySeedContent(i));
        }
        Ok(())
    }
}
