//! Per-entry records produced by a processing run.

use std::fs::Metadata;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordIssue;
use crate::hash::ContentHash;

/// Type of file system entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link, recorded without a hash when links are not followed.
    Symlink,
    /// Other file types (sockets, devices, etc.).
    Other,
}

impl EntryKind {
    /// Classify an entry from its metadata.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_file() {
            Self::File
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_symlink() {
            Self::Symlink
        } else {
            Self::Other
        }
    }
}

/// Metadata and content hash collected for one enumerated path.
///
/// Fields are `None` when they do not apply or could not be collected:
///
/// - directories carry `modified` only; `size` and `content_hash` are
///   always `None` rather than the directory inode's size
/// - a record whose entry vanished or could not be read has `issue` set
///   and keeps whatever was collected before the failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path as discovered during enumeration.
    pub path: PathBuf,

    /// Entry type, if the entry could be stat'ed.
    pub kind: Option<EntryKind>,

    /// Size in bytes (regular files only).
    pub size: Option<u64>,

    /// Last modification time.
    pub modified: Option<DateTime<Utc>>,

    /// Content digest (regular files only).
    pub content_hash: Option<ContentHash>,

    /// Failure that degraded this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<RecordIssue>,
}

impl FileRecord {
    /// Create a record from a single stat result. No hash is attached.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> Self {
        let kind = EntryKind::from_metadata(metadata);
        Self {
            path: path.into(),
            kind: Some(kind),
            size: (kind == EntryKind::File).then(|| metadata.len()),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            content_hash: None,
            issue: None,
        }
    }

    /// Create a record for an entry that could not be stat'ed at all.
    pub fn failed(path: impl Into<PathBuf>, issue: RecordIssue) -> Self {
        Self {
            path: path.into(),
            kind: None,
            size: None,
            modified: None,
            content_hash: None,
            issue: Some(issue),
        }
    }

    /// Attach a content hash.
    pub fn with_hash(mut self, hash: ContentHash) -> Self {
        self.content_hash = Some(hash);
        self
    }

    /// Attach an issue, keeping the fields collected so far.
    pub fn with_issue(mut self, issue: RecordIssue) -> Self {
        self.issue = Some(issue);
        self
    }

    /// Check if this record is for a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == Some(EntryKind::Directory)
    }

    /// Check if this record is for a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == Some(EntryKind::File)
    }

    /// Check if a failure degraded this record.
    pub fn is_degraded(&self) -> bool {
        self.issue.is_some()
    }
}
