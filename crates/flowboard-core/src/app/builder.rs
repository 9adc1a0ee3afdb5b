//! PlannerBuilder - Planner の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() 時に設定を検証し、不正なら BuildError を返す
//! - ports を指定しなければ本番用のデフォルト実装を使う

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::app::config::{ConfigError, PlannerConfig};
use crate::app::runtime::{BoardHandle, BoardRuntime};
use crate::impls::NoopEventSink;
use crate::planner::Planner;
use crate::ports::{EventSink, IdGenerator, SystemClock, Ticker, UlidGenerator};

/// # 使用例
/// ```ignore
/// let planner = PlannerBuilder::new()
///     .config(PlannerConfig::from_path("board.json")?)
///     .event_sink(Arc::new(TracingEventSink))
///     .build()?;
/// ```
pub struct PlannerBuilder {
    config: PlannerConfig,
    ids: Option<Arc<dyn IdGenerator>>,
    events: Option<Arc<dyn EventSink>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl PlannerBuilder {
    pub fn new() -> Self {
        Self {
            config: PlannerConfig::default(),
            ids: None,
            events: None,
        }
    }

    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Result<Planner, BuildError> {
        self.config.validate()?;
        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(SystemClock)),
        };
        let events: Arc<dyn EventSink> = match self.events {
            Some(events) => events,
            None => Arc::new(NoopEventSink),
        };
        Ok(Planner::new(&self.config, ids, events))
    }

    /// Build and start a runtime on the current tokio runtime.
    pub fn spawn<T: Ticker>(self, ticker: T) -> Result<(BoardHandle, JoinHandle<Planner>), BuildError> {
        let planner = self.build()?;
        Ok(BoardRuntime::new(planner, Arc::new(ticker)).spawn())
    }
}

impl Default for PlannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
