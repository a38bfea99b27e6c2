//! Process memory usage snapshot

use serde::Serialize;
use sysinfo::{ProcessesToUpdate, System};

/// Memory consumption of the current process, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    /// Resident set size
    pub rss: u64,
    /// Total virtual address space
    #[serde(rename = "virtual")]
    pub virtual_size: u64,
}

impl MemoryUsage {
    /// Read the current process memory usage
    ///
    /// Zeros if the OS refuses to report on this process.
    pub fn current() -> Self {
        let Ok(pid) = sysinfo::get_current_pid() else {
            return Self::default();
        };

        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        sys.process(pid)
            .map(|proc| Self {
                rss: proc.memory(),
                virtual_size: proc.virtual_memory(),
            })
            .unwrap_or_default()
    }
}
