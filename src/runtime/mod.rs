//! Point-in-time view of the running process
//!
//! Every call to [`RuntimeProbe::snapshot`] recomputes all values; nothing
//! is cached between requests.

pub mod clock;
pub mod host;
pub mod memory;

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Duration;

pub use clock::{Clock, ClockReading, ProcessClock};
pub use memory::MemoryUsage;

/// Compiler that built this binary, as reported by `rustc --version`
pub const RUNTIME_VERSION: &str = env!("PODPROBE_RUSTC_VERSION");

/// Read-only snapshot of process and host state
#[derive(Debug, Clone)]
pub struct RuntimeSnapshot {
    pub timestamp: DateTime<Utc>,
    pub uptime: Duration,
    pub hostname: String,
    pub platform: &'static str,
    pub memory: MemoryUsage,
    pub runtime_version: &'static str,
}

impl RuntimeSnapshot {
    /// Timestamp as ISO-8601 UTC with millisecond precision
    pub fn timestamp_iso(&self) -> String {
        format_timestamp(self.timestamp)
    }
}

/// Format a UTC instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Source of runtime snapshots
pub struct RuntimeProbe {
    clock: Arc<dyn Clock>,
}

impl RuntimeProbe {
    /// Probe on the real clock, with uptime measured from now
    pub fn new() -> Self {
        Self::with_clock(Arc::new(ProcessClock::start()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Current wall-clock time
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.read().at
    }

    /// Take a fresh snapshot
    pub fn snapshot(&self) -> RuntimeSnapshot {
        let ClockReading { at, uptime } = self.clock.read();
        RuntimeSnapshot {
            timestamp: at,
            uptime,
            hostname: host::hostname(),
            platform: host::platform(),
            memory: MemoryUsage::current(),
            runtime_version: RUNTIME_VERSION,
        }
    }
}

impl Default for RuntimeProbe {
    fn default() -> Self {
        Self::new()
    }
}
