use serde::{Deserialize, Serialize};

/// Periodic reminder rung while focus time accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniBell {
    pub enabled: bool,
    pub interval_minutes: u32,
    pub last_fired_seconds: u64,
}

impl MiniBell {
    pub fn new(enabled: bool, interval_minutes: u32) -> Self {
        Self {
            enabled,
            interval_minutes,
            last_fired_seconds: 0,
        }
    }

    pub fn interval_seconds(&self) -> u64 {
        u64::from(self.interval_minutes) * 60
    }

    /// Fires once at least one interval has passed since the last ring.
    /// Records the ring so the same boundary never fires twice.
    pub fn check(&mut self, elapsed_seconds: u64) -> bool {
        if !self.enabled || self.interval_minutes == 0 || elapsed_seconds == 0 {
            return false;
        }

        if elapsed_seconds.saturating_sub(self.last_fired_seconds) >= self.interval_seconds() {
            self.last_fired_seconds = elapsed_seconds;
            return true;
        }

        false
    }

    pub fn rewind(&mut self) {
        self.last_fired_seconds = 0;
    }
}
