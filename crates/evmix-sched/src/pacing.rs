//! Real-time pacing
//!
//! Holds emission back until the wall clock catches up with simulated
//! time. Advisory only: a slow consumer simply makes the stream lag, and
//! nothing tries to catch up by skipping records.

use std::time::{Duration, Instant};

/// Wall-clock pacer for simulated session time
#[derive(Debug)]
pub struct RealTimePacer {
    /// Wall-clock instant at which mixing began
    started: Instant,
}

impl RealTimePacer {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(started: Instant) -> Self {
        RealTimePacer { started }
    }

    /// How long to wait before emitting something at `simulated` session
    /// seconds, given `wall` time already elapsed
    pub fn delay_for(simulated: f64, wall: Duration) -> Option<Duration> {
        let ahead = simulated - wall.as_secs_f64();
        if ahead.is_finite() && ahead > 0.0 {
            Some(Duration::from_secs_f64(ahead))
        } else {
            None
        }
    }

    /// Sleep until the wall clock reaches `simulated` session seconds.
    /// Returns the time slept.
    pub fn pace(&self, simulated: f64) -> Duration {
        match Self::delay_for(simulated, self.started.elapsed()) {
            Some(delay) => {
                std::thread::sleep(delay);
                delay
            }
            None => Duration::ZERO,
        }
    }
}

impl Default for RealTimePacer {
    fn default() -> Self {
        Self::new()
    }
}
