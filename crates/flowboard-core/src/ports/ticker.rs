//! Ticker port - 進捗タイマーの抽象化
//!
//! 疑似進捗は「interval ごとに 1 tick」で進みます。待ち方だけをこの trait に
//! 切り出しているので、テストでは実時間を待たずに済みます。

use std::time::Duration;

use async_trait::async_trait;

/// Ticker は 1 interval 分の待機を提供
///
/// # 実装
/// - TokioTicker: `tokio::time::sleep`（paused clock のテストでも決定的）
/// - InstantTicker: 待たずに yield だけする
#[async_trait]
pub trait Ticker: Send + Sync + 'static {
    async fn wait(&self, period: Duration);
}
