//! Timer phase and snapshot structures

use serde::{Deserialize, Serialize};

/// Discrete phase of the timer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    CountingDown,
    OnBreak,
    Finished,
}

impl Phase {
    /// Check if a periodic trigger is ticking in this phase
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::CountingDown | Phase::OnBreak)
    }

    /// Label shown next to the main timer value
    pub fn label(&self) -> &'static str {
        match self {
            Phase::CountingDown => "Total Countdown:",
            Phase::OnBreak => "Break Time:",
            Phase::Idle | Phase::Finished => "",
        }
    }
}

/// Timer state snapshot published to watchers and the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: Option<u64>,
    /// `HH:MM` start time a deferred session is waiting for
    pub scheduled_start: Option<String>,
}

impl TimerState {
    /// Create a new idle timer state
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: None,
            scheduled_start: None,
        }
    }

    /// Create a snapshot for a ticking phase with remaining seconds
    pub fn running(phase: Phase, remaining_seconds: u64) -> Self {
        Self {
            phase,
            remaining_seconds: Some(remaining_seconds),
            scheduled_start: None,
        }
    }

    /// Create a snapshot for a session waiting on its start clock-time
    pub fn scheduled(start: String) -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: None,
            scheduled_start: Some(start),
        }
    }

    /// Create a finished snapshot
    pub fn finished() -> Self {
        Self {
            phase: Phase::Finished,
            remaining_seconds: None,
            scheduled_start: None,
        }
    }

    /// Check if the timer is actively ticking
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::idle()
    }
}
