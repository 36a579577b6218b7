use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::records::JumpStatus;

/// Point-in-time tallies for a batch of processed track files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSnapshot {
    pub scored: usize,
    pub warm_up: usize,
    pub rejected: usize,
    pub unreadable: usize,
}

/// Thread-safe counters for batch processing. Jump analyses share no state,
/// so this is the only synchronization a parallel batch would need.
pub struct BatchMetrics {
    inner: Mutex<BatchSnapshot>,
}

impl BatchMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BatchSnapshot::default()),
        }
    }

    pub fn record(&self, status: JumpStatus) {
        if let Ok(mut snapshot) = self.inner.lock() {
            match status {
                JumpStatus::Ok | JumpStatus::AltitudeExceedsMinimum => snapshot.scored += 1,
                JumpStatus::WarmUpFile => snapshot.warm_up += 1,
                JumpStatus::InvalidSpeedFile => snapshot.unreadable += 1,
                JumpStatus::SpeedAccuracyExceedsLimit | JumpStatus::AltitudeExceedsMaximum => {
                    snapshot.rejected += 1
                }
            }
        }
    }

    pub fn snapshot(&self) -> BatchSnapshot {
        self.inner
            .lock()
            .map(|snapshot| *snapshot)
            .unwrap_or_default()
    }
}

impl Default for BatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}
