//! Ticker の実装

use std::time::Duration;

use async_trait::async_trait;

use crate::ports::Ticker;

/// 本番用: tokio の timer で待つ
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTicker;

#[async_trait]
impl Ticker for TokioTicker {
    async fn wait(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}

/// 待たずに他のタスクへ制御を譲るだけの Ticker
///
/// tick の順序は保たれるので、時間に依存しないテストやデモの早送りに使います。
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantTicker;

#[async_trait]
impl Ticker for InstantTicker {
    async fn wait(&self, _period: Duration) {
        tokio::task::yield_now().await;
    }
}
