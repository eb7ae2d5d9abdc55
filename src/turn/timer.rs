//! Per-turn countdown.
//!
//! The timer is cooperative: the host calls [`TimerController::tick`] once
//! per second and acts on the returned [`TimerStep`]. Every arm is bound to a
//! turn number, and expiry reports that turn, so an expiry can never resolve
//! a turn other than the one it was armed for.

use serde::{Deserialize, Serialize};

/// What a single tick produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerStep {
    /// Timer is not running.
    Idle,
    /// Seconds remaining, for display.
    Tick {
        /// Turn the timer was armed for.
        turn: u32,
        /// Seconds left before expiry.
        remaining: u32,
    },
    /// Countdown reached zero; the timer has stopped itself.
    Expired {
        /// Turn the timer was armed for.
        turn: u32,
    },
}

/// Countdown from a fixed duration to zero.
///
/// ## Behavior
///
/// - `arm(turn)`: restart from the full duration for `turn`
/// - `tick()`: `Tick { remaining: duration }` down to `Tick { remaining: 1 }`,
///   then `Expired` once, then `Idle`
/// - `stop()`: idempotent; later ticks are `Idle`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimerController {
    duration: u32,
    remaining: u32,
    armed_turn: u32,
    running: bool,
}

impl TimerController {
    /// Create a stopped timer with the given per-turn duration in seconds.
    #[must_use]
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
            armed_turn: 0,
            running: false,
        }
    }

    /// Restart the countdown for a turn.
    pub fn arm(&mut self, turn: u32) {
        self.remaining = self.duration;
        self.armed_turn = turn;
        self.running = true;
    }

    /// Stop the countdown. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TimerStep {
        if !self.running {
            return TimerStep::Idle;
        }
        if self.remaining == 0 {
            self.running = false;
            return TimerStep::Expired {
                turn: self.armed_turn,
            };
        }
        let remaining = self.remaining;
        self.remaining -= 1;
        TimerStep::Tick {
            turn: self.armed_turn,
            remaining,
        }
    }

    /// Check whether the countdown is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds left before the next tick reports.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Turn the timer was last armed for.
    #[must_use]
    pub fn armed_turn(&self) -> u32 {
        self.armed_turn
    }

    /// Configured duration in seconds.
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }
}
