//! Process clock: wall time and uptime read together
//!
//! A snapshot takes a single [`ClockReading`] so its timestamp and uptime
//! describe the same instant. `ProcessClock` measures uptime with a
//! monotonic `Instant`; tests drive both values with `ManualClock`.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Wall-clock time paired with time since process start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReading {
    pub at: DateTime<Utc>,
    pub uptime: Duration,
}

/// Source of clock readings, injected into `RuntimeProbe`
pub trait Clock: Send + Sync {
    fn read(&self) -> ClockReading;
}

/// Real clock; uptime counts from construction
pub struct ProcessClock {
    started: Instant,
}

impl ProcessClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Clock for ProcessClock {
    fn read(&self) -> ClockReading {
        ClockReading {
            at: Utc::now(),
            uptime: self.started.elapsed(),
        }
    }
}

/// Hand-driven clock; `advance` moves wall time and uptime in lockstep
#[cfg(test)]
pub struct ManualClock {
    reading: std::sync::Mutex<ClockReading>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl ManualClock {
    pub fn starting_at(at: DateTime<Utc>) -> Self {
        Self {
            reading: std::sync::Mutex::new(ClockReading {
                at,
                uptime: Duration::ZERO,
            }),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut reading = self.reading.lock().expect("clock poisoned");
        reading.uptime += by;
        reading.at += chrono::Duration::from_std(by).expect("advance fits in chrono range");
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl Clock for ManualClock {
    fn read(&self) -> ClockReading {
        *self.reading.lock().expect("clock poisoned")
    }
}
