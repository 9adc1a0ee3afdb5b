//! Ports - 抽象化レイヤー
//!
//! 時刻・ID 生成・タイマー・イベント記録を trait として切り出し、
//! テストでは決定的な実装に差し替えられるようにしています。

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod ticker;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::ticker::Ticker;
