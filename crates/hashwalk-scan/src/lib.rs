//! Listing, hashing and per-file processing for hashwalk.
//!
//! # Overview
//!
//! `hashwalk-scan` walks a directory tree and produces one
//! [`FileRecord`] per entry with its size, modification time and content
//! hash. Key properties:
//!
//! - **Lazy listing** via jwalk; memory does not grow with tree size
//! - **Failure isolation**: an entry that vanishes or cannot be read yields a
//!   degraded record instead of aborting the run
//! - **Selectable digest**: SHA-256 (default), BLAKE3, or legacy MD5
//! - **Progress updates** via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use hashwalk_scan::{FileProcessor, ProcessorConfig};
//!
//! let processor = FileProcessor::new(ProcessorConfig::new("/path/to/tree"));
//! let report = processor.run().unwrap();
//!
//! for record in &report.records {
//!     if let Some(hash) = &record.content_hash {
//!         println!("{hash}  {}", record.path.display());
//!     }
//! }
//! ```
//!
//! The three building blocks are also available on their own:
//!
//! ```rust,no_run
//! use hashwalk_scan::{HashAlgorithm, ProcessorConfig, compute_hash, list_files, process_files};
//!
//! let paths: Vec<_> = list_files("/path/to/tree", false).unwrap().collect();
//! let records = process_files(paths, &ProcessorConfig::new("/path/to/tree"));
//!
//! let digest = compute_hash(std::path::Path::new("/etc/hosts"), HashAlgorithm::Blake3).unwrap();
//! ```

mod hasher;
mod lister;
mod processor;
mod progress;

pub use hasher::{compute_hash, hash_bytes, hash_reader};
pub use lister::{FileList, FileLister, WalkWarning, list_files};
pub use processor::{FileProcessor, process_files};
pub use progress::ProcessProgress;

// Re-export core types for convenience
pub use hashwalk_core::{
    ContentHash, EntryKind, ErrorKind, FileRecord, HashAlgorithm, ProcessError, ProcessReport,
    ProcessStats, ProcessorConfig, RecordIssue,
};
