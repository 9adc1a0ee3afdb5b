//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **TokioTicker / InstantTicker**: Ticker
//! - **NoopEventSink / TracingEventSink / RecordingEventSink**: EventSink

pub mod event_sinks;
pub mod tickers;

pub use self::event_sinks::{NoopEventSink, RecordingEventSink, TracingEventSink};
pub use self::tickers::{InstantTicker, TokioTicker};
