//! Processing progress reporting.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use hashwalk_core::FileRecord;

/// Progress information during a processing run.
#[derive(Debug, Clone)]
pub struct ProcessProgress {
    /// Number of records produced so far.
    pub entries_processed: u64,
    /// Total bytes hashed so far.
    pub bytes_hashed: u64,
    /// Number of degraded records so far.
    pub degraded: u64,
    /// Path of the most recent record.
    pub current_path: PathBuf,
    /// Time elapsed since the run started.
    pub elapsed: Duration,
}

impl ProcessProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            entries_processed: 0,
            bytes_hashed: 0,
            degraded: 0,
            current_path: PathBuf::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate rate in entries per second.
    pub fn entries_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.entries_processed as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate hashing throughput in bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.bytes_hashed as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ProcessProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal progress tracker with timing.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    entries_processed: u64,
    bytes_hashed: u64,
    degraded: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            entries_processed: 0,
            bytes_hashed: 0,
            degraded: 0,
            current_path: PathBuf::new(),
        }
    }

    pub fn record(&mut self, record: &FileRecord) {
        self.entries_processed += 1;
        if record.content_hash.is_some() {
            self.bytes_hashed += record.size.unwrap_or(0);
        }
        if record.is_degraded() {
            self.degraded += 1;
        }
        self.current_path.clone_from(&record.path);
    }

    pub fn entries_processed(&self) -> u64 {
        self.entries_processed
    }

    pub fn snapshot(&self) -> ProcessProgress {
        ProcessProgress {
            entries_processed: self.entries_processed,
            bytes_hashed: self.bytes_hashed,
            degraded: self.degraded,
            current_path: self.current_path.clone(),
            elapsed: self.start_time.elapsed(),
        }
    }
}
