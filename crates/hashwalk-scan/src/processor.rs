//! Per-entry metadata collection and hashing.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use rayon::prelude::*;
use tokio::sync::broadcast;

use hashwalk_core::{
    FileRecord, HashAlgorithm, ProcessError, ProcessReport, ProcessorConfig, RecordIssue,
};

use crate::hasher::{hash_open_file, warn_if_legacy};
use crate::lister::{FileList, FileLister};
use crate::progress::{ProcessProgress, ProgressTracker};

/// Records between two progress broadcasts.
const PROGRESS_INTERVAL: u64 = 256;

/// Lists a tree and turns every entry into a [`FileRecord`].
pub struct FileProcessor {
    config: ProcessorConfig,
    progress_tx: broadcast::Sender<ProcessProgress>,
}

impl FileProcessor {
    /// Create a new processor.
    pub fn new(config: ProcessorConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config,
            progress_tx,
        }
    }

    /// Configuration of this processor.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Subscribe to progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ProcessProgress> {
        self.progress_tx.subscribe()
    }

    /// Enumerate the configured root.
    pub fn list(&self) -> Result<FileList, ProcessError> {
        FileLister::new(self.config.clone()).list()
    }

    /// Build the record for a single path. Never fails; errors are recorded.
    pub fn process_path(&self, path: &Path) -> FileRecord {
        process_entry(path, self.config.algorithm, self.config.follow_symlinks)
    }

    /// Build one record per path, in input order.
    ///
    /// A path that vanished, became unreadable or turned out to be a
    /// directory yields a degraded record; the remaining paths are still
    /// processed.
    pub fn process_files<I>(&self, paths: I) -> Vec<FileRecord>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let tracker = Mutex::new(ProgressTracker::new());
        let algorithm = self.config.algorithm;
        let follow_symlinks = self.config.follow_symlinks;

        let records: Vec<FileRecord> = if self.config.parallel {
            let paths: Vec<PathBuf> = paths.into_iter().collect();
            paths
                .par_iter()
                .map(|path| {
                    let record = process_entry(path, algorithm, follow_symlinks);
                    self.track(&tracker, &record);
                    record
                })
                .collect()
        } else {
            paths
                .into_iter()
                .map(|path| {
                    let record = process_entry(&path, algorithm, follow_symlinks);
                    self.track(&tracker, &record);
                    record
                })
                .collect()
        };

        if let Ok(tracker) = tracker.into_inner() {
            let _ = self.progress_tx.send(tracker.snapshot());
        }

        records
    }

    /// List the root and process every entry.
    ///
    /// Only a failure to read the root itself is returned as an error.
    /// Entries the walk could not read are appended as degraded records.
    pub fn run(&self) -> Result<ProcessReport, ProcessError> {
        let start = Instant::now();
        warn_if_legacy(self.config.algorithm);

        let mut list = self.list()?;
        let mut records = self.process_files(list.by_ref());

        for warning in list.into_warnings() {
            records.push(FileRecord::failed(warning.path, warning.issue));
        }

        let report = ProcessReport::new(
            self.config.root.clone(),
            self.config.algorithm,
            records,
            start.elapsed(),
        );

        tracing::info!(
            root = %report.root.display(),
            entries = report.stats.total_entries,
            degraded = report.stats.degraded,
            elapsed_ms = report.duration.as_millis() as u64,
            "processing finished"
        );

        Ok(report)
    }

    fn track(&self, tracker: &Mutex<ProgressTracker>, record: &FileRecord) {
        let Ok(mut tracker) = tracker.lock() else {
            return;
        };
        tracker.record(record);
        if tracker.entries_processed() % PROGRESS_INTERVAL == 0 {
            let _ = self.progress_tx.send(tracker.snapshot());
        }
    }
}

/// Process `paths` with the given configuration.
pub fn process_files<I>(paths: I, config: &ProcessorConfig) -> Vec<FileRecord>
where
    I: IntoIterator<Item = PathBuf>,
{
    FileProcessor::new(config.clone()).process_files(paths)
}

/// Collect metadata and hash for one path inside a single failure scope.
///
/// Size and mtime come from one stat. For regular files the stat of the
/// handle that is hashed replaces the path stat, so the recorded size
/// belongs to the hashed content. Unless links are followed, a symlink is
/// recorded as such and its target is not read.
fn process_entry(path: &Path, algorithm: HashAlgorithm, follow_symlinks: bool) -> FileRecord {
    let stat = if follow_symlinks {
        std::fs::metadata(path)
    } else {
        std::fs::symlink_metadata(path)
    };
    let metadata = match stat {
        Ok(m) => m,
        Err(e) => {
            let err = ProcessError::io(path, e);
            tracing::warn!(path = %path.display(), error = %err, "entry vanished or unreadable");
            return FileRecord::failed(path, RecordIssue::from(&err));
        }
    };

    let record = FileRecord::from_metadata(path, &metadata);
    if !metadata.is_file() {
        tracing::debug!(path = %path.display(), kind = ?record.kind, "no content hash for non-regular entry");
        return record;
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            let err = ProcessError::io(path, e);
            tracing::warn!(path = %path.display(), error = %err, "cannot open file for hashing");
            return record.with_issue(RecordIssue::from(&err));
        }
    };

    match hash_open_file(path, file, algorithm) {
        Ok((Some(hash), handle_metadata)) => {
            FileRecord::from_metadata(path, &handle_metadata).with_hash(hash)
        }
        Ok((None, handle_metadata)) => FileRecord::from_metadata(path, &handle_metadata),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "hashing failed");
            record.with_issue(RecordIssue::from(&err))
        }
    }
}
