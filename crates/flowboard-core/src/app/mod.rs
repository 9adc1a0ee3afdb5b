//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **PlannerBuilder**: 設定と ports から Planner を組み立てる
//! - **PlannerConfig**: 進捗プロファイル・カラム名・初期タスク
//! - **BoardRuntime / BoardHandle**: Planner を単一の論理スレッドで動かすアクター

pub mod builder;
pub mod config;
pub mod runtime;

pub use self::builder::{BuildError, PlannerBuilder};
pub use self::config::{ConfigError, PlannerConfig, SeedTask};
pub use self::runtime::{BoardHandle, BoardRuntime, CommandError, RuntimeError};
