//! flowboard-core
//!
//! Kanban ボード（todo / doing / done）のコアロジック。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, column, board, progress, errors, events）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, Ticker, EventSink）
//! - **impls**: ports の実装（TokioTicker, RecordingEventSink など）
//! - **planner**: Board の変更と疑似進捗フロー（同期的な状態機械）
//! - **app**: 構築・設定・tokio ランタイム

pub mod app;
pub mod domain;
pub mod impls;
pub mod planner;
pub mod ports;

pub use app::{BoardHandle, PlannerBuilder, PlannerConfig};
pub use domain::{ColumnId, Priority, Rejection, TaskId};
pub use planner::Planner;
