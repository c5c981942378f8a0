//! Processing report container and statistics.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hash::HashAlgorithm;
use crate::record::{EntryKind, FileRecord};

/// Summary statistics for a processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStats {
    /// Total number of records.
    pub total_entries: u64,
    /// Number of regular-file records.
    pub files: u64,
    /// Number of directory records.
    pub dirs: u64,
    /// Number of records carrying a content hash.
    pub hashed: u64,
    /// Number of records degraded by a per-entry failure.
    pub degraded: u64,
    /// Total size in bytes of all sized records.
    pub total_size: u64,
    /// Largest file (path, size).
    pub largest_file: Option<(PathBuf, u64)>,
}

impl ProcessStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with a record.
    pub fn record(&mut self, record: &FileRecord) {
        self.total_entries += 1;

        match record.kind {
            Some(EntryKind::File) => self.files += 1,
            Some(EntryKind::Directory) => self.dirs += 1,
            _ => {}
        }

        if record.content_hash.is_some() {
            self.hashed += 1;
        }
        if record.is_degraded() {
            self.degraded += 1;
        }

        if let Some(size) = record.size {
            self.total_size += size;

            if self.largest_file.as_ref().is_none_or(|(_, s)| size > *s) {
                self.largest_file = Some((record.path.clone(), size));
            }
        }
    }

    /// Build stats over a slice of records.
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut stats = Self::new();
        for record in records {
            stats.record(record);
        }
        stats
    }
}

/// Complete result of one processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessReport {
    /// Root path that was processed.
    pub root: PathBuf,

    /// Digest algorithm used.
    pub algorithm: HashAlgorithm,

    /// When this run finished.
    pub processed_at: DateTime<Utc>,

    /// Duration of the run.
    pub duration: Duration,

    /// Summary statistics.
    pub stats: ProcessStats,

    /// One record per enumerated path, in enumeration order.
    pub records: Vec<FileRecord>,
}

impl ProcessReport {
    /// Create a new report, computing stats from the records.
    pub fn new(
        root: PathBuf,
        algorithm: HashAlgorithm,
        records: Vec<FileRecord>,
        duration: Duration,
    ) -> Self {
        Self {
            root,
            algorithm,
            processed_at: Utc::now(),
            duration,
            stats: ProcessStats::from_records(&records),
            records,
        }
    }

    /// Records degraded by a per-entry failure.
    pub fn degraded(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| r.is_degraded())
    }

    /// Check if every record was collected completely.
    pub fn is_clean(&self) -> bool {
        self.stats.degraded == 0
    }
}
