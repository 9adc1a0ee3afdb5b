//! ProgressSimulator - 0% から 100% まで一定幅で進む疑似オペレーション
//!
//! タイマーは持ちません。tick は外側（Ticker port を使うランタイム、
//! あるいはテスト）から `advance()` を呼ぶことで届きます。

use thiserror::Error;

use crate::domain::ProgressProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("progress simulator is already running")]
pub struct AlreadyRunning;

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Percent after this tick, clamped to 100.
    pub percent: u8,
    /// Set on exactly one tick: the one that reached 100.
    pub completed: bool,
}

/// State machine: Idle -> Running(percent) -> Idle.
#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    profile: ProgressProfile,
    running: Option<u8>,
}

impl ProgressSimulator {
    pub fn new(profile: ProgressProfile) -> Self {
        Self {
            profile,
            running: None,
        }
    }

    pub fn profile(&self) -> &ProgressProfile {
        &self.profile
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Current percent, `None` while idle.
    pub fn percent(&self) -> Option<u8> {
        self.running
    }

    /// Begin at 0%. A running simulator is left untouched.
    pub fn start(&mut self) -> Result<(), AlreadyRunning> {
        if self.running.is_some() {
            return Err(AlreadyRunning);
        }
        self.running = Some(0);
        Ok(())
    }

    /// Advance by one increment. Returns `None` when idle.
    pub fn advance(&mut self) -> Option<Tick> {
        let current = self.running?;
        let next = current.saturating_add(self.profile.increment.max(1)).min(100);
        if next >= 100 {
            self.running = None;
            Some(Tick {
                percent: 100,
                completed: true,
            })
        } else {
            self.running = Some(next);
            Some(Tick {
                percent: next,
                completed: false,
            })
        }
    }
}
