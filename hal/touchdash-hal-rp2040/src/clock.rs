//! Millisecond clock over the embassy time driver

use embassy_time::Instant;
use touchdash_hal::Clock;

/// Milliseconds since construction, wrapping at `u32::MAX`
pub struct InstantClock {
    start: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now_ms(&mut self) -> u32 {
        // Truncation is the wrap
        self.start.elapsed().as_millis() as u32
    }
}
