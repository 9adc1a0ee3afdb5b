//! EventSink port - イベント記録の抽象化

use crate::domain::BoardEvent;

/// EventSink は確定した BoardEvent を受け取る
///
/// Planner と同じ論理スレッドから同期的に呼ばれます。重い処理は置かないこと。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &BoardEvent);
}
