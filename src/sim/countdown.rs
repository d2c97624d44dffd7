//! Pre-start countdown: 3, 2, 1, START!, then play

use serde::{Deserialize, Serialize};

use crate::consts::COUNTDOWN_FROM;

/// What the countdown shows after one advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "value", rename_all = "snake_case")]
pub enum CountdownStep {
    /// A numbered beat
    Beat(u32),
    /// The "START!" beat
    Go,
    /// Countdown finished, the session should start now
    Done,
}

/// One-second countdown shown before a session starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    current: CountdownStep,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(COUNTDOWN_FROM)
    }
}

impl Countdown {
    /// Countdown from `from` (zero goes straight to "START!")
    pub fn new(from: u32) -> Self {
        let current = if from == 0 {
            CountdownStep::Go
        } else {
            CountdownStep::Beat(from)
        };
        Self { current }
    }

    /// What is currently on screen
    pub fn current(&self) -> CountdownStep {
        self.current
    }

    pub fn is_done(&self) -> bool {
        self.current == CountdownStep::Done
    }

    /// Move to the next beat (called once per second)
    pub fn advance(&mut self) -> CountdownStep {
        self.current = match self.current {
            CountdownStep::Beat(n) if n > 1 => CountdownStep::Beat(n - 1),
            CountdownStep::Beat(_) => CountdownStep::Go,
            CountdownStep::Go | CountdownStep::Done => CountdownStep::Done,
        };
        self.current
    }
}
