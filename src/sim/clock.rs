//! Frame-time to whole-second tick conversion
//!
//! The session clock only moves while the session is playing. Partial seconds
//! are dropped whenever play stops so a resumed session never receives a tick
//! that belongs to the time before the pause.

use super::session::Session;

/// Longest frame delta accepted, in seconds
const MAX_FRAME_DT: f64 = 0.25;

/// Accumulates frame deltas and feeds one-second ticks to a session
#[derive(Debug, Clone, Default)]
pub struct SecondClock {
    accumulator: f64,
    running: bool,
}

impl SecondClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the clock was running after the last update
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `dt` seconds of wall time and tick `session` for every whole
    /// second elapsed while it was playing. Returns the number of ticks.
    pub fn update(&mut self, dt: f64, session: &mut Session) -> u32 {
        if !session.is_playing() {
            if self.running {
                log::debug!("Clock stopped with {:.3}s pending", self.accumulator);
            }
            self.stop();
            return 0;
        }
        if !self.running {
            self.running = true;
            self.accumulator = 0.0;
        }

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut ticks = 0;
        while self.accumulator >= 1.0 && session.is_playing() {
            session.tick();
            self.accumulator -= 1.0;
            ticks += 1;
        }
        if !session.is_playing() {
            self.stop();
        }
        ticks
    }

    /// Drop any partial second
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }
}
