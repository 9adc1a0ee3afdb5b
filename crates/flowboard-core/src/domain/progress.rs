//! Progress - 疑似非同期オペレーションの種類とプロファイル

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::OperationId;

/// Kind of simulated progress operation. At most one of each kind runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressKind {
    TaskCreation,
    FileUpload,
}

impl fmt::Display for ProgressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressKind::TaskCreation => f.write_str("task-creation"),
            ProgressKind::FileUpload => f.write_str("file-upload"),
        }
    }
}

/// Pacing of one progress operation.
///
/// Durations are (de)serialized as whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressProfile {
    /// Percent added per tick.
    pub increment: u8,
    #[serde(rename = "interval_ms", with = "millis")]
    pub interval: Duration,
    /// Delay between reaching 100% and committing.
    #[serde(rename = "settle_ms", with = "millis", default)]
    pub settle: Duration,
}

impl ProgressProfile {
    pub const fn new(increment: u8, interval: Duration, settle: Duration) -> Self {
        Self {
            increment,
            interval,
            settle,
        }
    }

    /// 20% every 100ms, then a 400ms settle before the task appears.
    pub const fn task_creation() -> Self {
        Self::new(20, Duration::from_millis(100), Duration::from_millis(400))
    }

    /// 25% every 150ms, committed as soon as it reaches 100%.
    pub const fn file_upload() -> Self {
        Self::new(25, Duration::from_millis(150), Duration::ZERO)
    }

    /// Number of ticks needed to reach 100%.
    pub fn ticks_to_complete(&self) -> u32 {
        let step = u32::from(self.increment.max(1));
        100u32.div_ceil(step)
    }
}

/// Externally visible state of a progress flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowStatus {
    #[default]
    Idle,
    InProgress { op: OperationId, percent: u8 },
    Settling { op: OperationId },
}

impl FlowStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, FlowStatus::Idle)
    }

    /// Percent to display; a settling flow shows 100.
    pub fn percent(&self) -> Option<u8> {
        match self {
            FlowStatus::Idle => None,
            FlowStatus::InProgress { percent, .. } => Some(*percent),
            FlowStatus::Settling { .. } => Some(100),
        }
    }

    pub fn operation(&self) -> Option<OperationId> {
        match self {
            FlowStatus::Idle => None,
            FlowStatus::InProgress { op, .. } | FlowStatus::Settling { op } => Some(*op),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(d.as_millis())
            .map_err(|_| S::Error::custom(format!("{d:?} does not fit in u64 milliseconds")))?;
        s.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::creation(20, 5)]
    #[case::upload(25, 4)]
    #[case::overshoot(30, 4)]
    #[case::single_step(100, 1)]
    #[case::tiny(1, 100)]
    fn ticks_to_complete_rounds_up(#[case] increment: u8, #[case] expected: u32) {
        let profile = ProgressProfile::new(increment, Duration::from_millis(10), Duration::ZERO);
        assert_eq!(profile.ticks_to_complete(), expected);
    }

    #[test]
    fn profile_serializes_durations_as_millis() {
        let json = serde_json::to_value(ProgressProfile::task_creation()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "increment": 20, "interval_ms": 100, "settle_ms": 400 })
        );

        let parsed: ProgressProfile =
            serde_json::from_str(r#"{ "increment": 50, "interval_ms": 5 }"#).unwrap();
        assert_eq!(parsed.interval, Duration::from_millis(5));
        assert_eq!(parsed.settle, Duration::ZERO);
    }

    #[test]
    fn oversized_duration_fails_to_serialize() {
        let profile = ProgressProfile::new(20, Duration::MAX, Duration::ZERO);
        let err = serde_json::to_value(profile).unwrap_err();
        assert!(err.to_string().contains("does not fit"), "{err}");
    }

    #[test]
    fn settling_flow_reports_full_progress() {
        let op = OperationId::from_ulid(ulid::Ulid::new());
        assert_eq!(FlowStatus::Settling { op }.percent(), Some(100));
        assert_eq!(FlowStatus::Idle.percent(), None);
        assert_eq!(FlowStatus::InProgress { op, percent: 40 }.operation(), Some(op));
    }
}
