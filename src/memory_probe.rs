//! Memory-usage measurement for the sharded cache's eviction sweeper.
//!
//! The probe is a capability passed at construction so tests and benchmarks
//! can simulate memory pressure instead of manipulating real process memory.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the "current process memory usage" reading the sweeper compares
/// against [`CleanupSettings::max_memory_size`](crate::CleanupSettings::max_memory_size).
pub trait MemoryProbe: Send + Sync {
    /// Current memory usage in bytes.
    ///
    /// A probe that cannot measure should return `0`; the sweeper then treats
    /// the process as under the ceiling and the failed measurement is fatal
    /// only to that tick.
    fn current_usage(&self) -> u64;
}

/// Default probe reporting the process resident set size.
///
/// On Linux this reads the resident page count from `/proc/self/statm`.
/// Elsewhere it falls back to system-wide used memory via `sys-info`, which
/// overestimates but errs on the side of sweeping.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessMemoryProbe;

impl MemoryProbe for ProcessMemoryProbe {
    #[cfg(target_os = "linux")]
    fn current_usage(&self) -> u64 {
        let statm = match std::fs::read_to_string("/proc/self/statm") {
            Ok(contents) => contents,
            Err(_) => return 0,
        };
        // Second field is the resident set in pages.
        statm
            .split_whitespace()
            .nth(1)
            .and_then(|pages| pages.parse::<u64>().ok())
            .map(|pages| pages * 4096)
            .unwrap_or(0)
    }

    #[cfg(not(target_os = "linux"))]
    fn current_usage(&self) -> u64 {
        match sys_info::mem_info() {
            Ok(info) => info.total.saturating_sub(info.avail) * 1024,
            Err(_) => 0,
        }
    }
}

/// Probe returning a configured value; the "simulated memory" seam used by
/// tests and the benchmark driver.
///
/// # Examples
///
/// ```
/// use tricache::{FixedMemoryProbe, MemoryProbe};
///
/// let probe = FixedMemoryProbe::new(1024);
/// assert_eq!(probe.current_usage(), 1024);
/// probe.set(0);
/// assert_eq!(probe.current_usage(), 0);
/// ```
#[derive(Debug, Default)]
pub struct FixedMemoryProbe {
    bytes: AtomicU64,
}

impl FixedMemoryProbe {
    pub fn new(bytes: u64) -> Self {
        Self {
            bytes: AtomicU64::new(bytes),
        }
    }

    /// Changes the reported usage; visible to an already-running sweeper.
    pub fn set(&self, bytes: u64) {
        self.bytes.store(bytes, Ordering::Relaxed);
    }
}

impl MemoryProbe for FixedMemoryProbe {
    fn current_usage(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}
