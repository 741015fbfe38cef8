//! Countdown state structure and transitions

use serde::{Deserialize, Serialize};

/// Observable phase of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Stopped,
    Running,
    /// Stopped at zero after a run finished on its own
    Completed,
}

/// Result of applying one tick to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed
    Idle,
    /// Decremented, still running
    Advanced(u64),
    /// Reached zero on this tick
    Completed,
}

/// Authoritative countdown value plus run flag.
///
/// This is a plain state machine with no clock; the engine drives `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub remaining_seconds: u64,
    pub is_running: bool,
    /// Last duration set by the user, restored by `reset`
    pub configured_seconds: u64,
    pub completed: bool,
}

impl CountdownState {
    /// Create a stopped countdown at zero
    pub fn new() -> Self {
        Self {
            remaining_seconds: 0,
            is_running: false,
            configured_seconds: 0,
            completed: false,
        }
    }

    /// Assign a new duration. A running countdown is stopped first.
    pub fn set_duration(&mut self, total_seconds: u64) {
        self.is_running = false;
        self.completed = false;
        self.configured_seconds = total_seconds;
        self.remaining_seconds = total_seconds;
    }

    /// Enter Running. Returns `Ok(false)` when already running.
    pub fn start(&mut self) -> Result<bool, String> {
        if self.is_running {
            return Ok(false);
        }
        if self.remaining_seconds == 0 {
            return Err("Cannot start timer: no time remaining".to_string());
        }
        self.is_running = true;
        self.completed = false;
        Ok(true)
    }

    /// Advance by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }
        if self.remaining_seconds <= 1 {
            self.remaining_seconds = 0;
            self.is_running = false;
            self.completed = true;
            TickOutcome::Completed
        } else {
            self.remaining_seconds -= 1;
            TickOutcome::Advanced(self.remaining_seconds)
        }
    }

    /// Leave Running without touching the remaining time.
    /// Returns whether the countdown was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running;
        self.is_running = false;
        was_running
    }

    /// Stop and restore the configured duration
    pub fn reset(&mut self) {
        self.is_running = false;
        self.completed = false;
        self.remaining_seconds = self.configured_seconds;
    }

    pub fn phase(&self) -> Phase {
        if self.is_running {
            Phase::Running
        } else if self.completed {
            Phase::Completed
        } else {
            Phase::Stopped
        }
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(total: u64) -> CountdownState {
        let mut state = CountdownState::new();
        state.set_duration(total);
        assert_eq!(state.start(), Ok(true));
        state
    }

    #[test]
    fn three_ticks_count_down_to_completion() {
        let mut state = started(3);
        assert_eq!(state.tick(), TickOutcome::Advanced(2));
        assert_eq!(state.tick(), TickOutcome::Advanced(1));
        assert_eq!(state.tick(), TickOutcome::Completed);
        assert_eq!(state.remaining_seconds, 0);
        assert_eq!(state.phase(), Phase::Completed);
        // further ticks are inert
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.remaining_seconds, 0);
    }

    #[test]
    fn start_requires_time_remaining() {
        let mut state = CountdownState::new();
        assert!(state.start().is_err());
        assert!(!state.is_running);
    }

    #[test]
    fn start_while_running_is_idempotent() {
        let mut state = started(10);
        assert_eq!(state.start(), Ok(false));
        assert!(state.is_running);
    }

    #[test]
    fn stop_keeps_remaining_and_never_completes() {
        let mut state = started(10);
        state.tick();
        assert!(state.stop());
        assert_eq!(state.remaining_seconds, 9);
        assert_eq!(state.phase(), Phase::Stopped);
        assert!(!state.stop());
    }

    #[test]
    fn reset_restores_configured_duration() {
        let mut state = started(5);
        state.tick();
        state.tick();
        state.reset();
        assert_eq!(state.remaining_seconds, 5);
        assert!(!state.is_running);

        let mut done = started(1);
        assert_eq!(done.tick(), TickOutcome::Completed);
        done.reset();
        assert_eq!(done.remaining_seconds, 1);
        assert_eq!(done.phase(), Phase::Stopped);
    }

    #[test]
    fn set_duration_forces_stop() {
        let mut state = started(60);
        state.set_duration(120);
        assert!(!state.is_running);
        assert_eq!(state.remaining_seconds, 120);
        assert_eq!(state.configured_seconds, 120);
    }
}
