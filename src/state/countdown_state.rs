//! Countdown state published by the timer controller

use serde::{Deserialize, Serialize};

use crate::timer::format_time;

/// Where a countdown run currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    #[default]
    Idle,
    Running,
    Expired,
}

/// Snapshot of the countdown, observed by displays and the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub remaining_seconds: u64,
    pub phase: TimerPhase,
    /// Id of the countdown run that produced this snapshot, 0 before the first start
    pub run: u64,
}

impl CountdownState {
    /// Create an idle state with nothing remaining
    pub fn new() -> Self {
        Self::default()
    }

    pub fn running(run: u64, remaining_seconds: u64) -> Self {
        Self {
            remaining_seconds,
            phase: TimerPhase::Running,
            run,
        }
    }

    pub fn expired(run: u64) -> Self {
        Self {
            remaining_seconds: 0,
            phase: TimerPhase::Expired,
            run,
        }
    }

    pub fn idle(run: u64) -> Self {
        Self {
            remaining_seconds: 0,
            phase: TimerPhase::Idle,
            run,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Remaining time as `HH:MM:SS`
    pub fn formatted(&self) -> String {
        format_time(self.remaining_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = CountdownState::new();
        assert_eq!(state.phase, TimerPhase::Idle);
        assert_eq!(state.remaining_seconds, 0);
        assert!(!state.is_running());
        assert_eq!(state.formatted(), "00:00:00");
    }

    #[test]
    fn test_running_state() {
        let state = CountdownState::running(4, 3661);
        assert!(state.is_running());
        assert_eq!(state.run, 4);
        assert_eq!(state.formatted(), "01:01:01");
    }

    #[test]
    fn test_terminal_states_have_nothing_remaining() {
        assert_eq!(CountdownState::expired(2).remaining_seconds, 0);
        assert_eq!(CountdownState::idle(2).remaining_seconds, 0);
        assert_eq!(CountdownState::expired(2).phase, TimerPhase::Expired);
    }
}
