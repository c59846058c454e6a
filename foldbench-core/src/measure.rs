//! Wall-Clock Timing
//!
//! Trial timing is taken from `std::time::Instant`, which is monotonic on every
//! supported platform. Calendar clocks (`SystemTime`) are never consulted, so
//! NTP adjustments during a run cannot skew a measurement.

use std::time::{Duration, Instant};

/// Stopwatch for a single timed region
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Reset the start point to now
    #[inline(always)]
    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    /// Time since the last start
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time since the last start in fractional milliseconds
    #[inline(always)]
    pub fn elapsed_millis(&self) -> f64 {
        duration_to_millis(self.elapsed())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

/// Convert a duration into fractional milliseconds
#[inline]
pub fn duration_to_millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
