//! Core types for hashwalk.
//!
//! This crate provides the data model shared by the listing and processing
//! engine and the command line front-end: per-file records, hash algorithm
//! selection, configuration, reports and errors.

mod config;
mod error;
mod hash;
mod record;
mod report;

pub use config::{ProcessorConfig, ProcessorConfigBuilder};
pub use error::{ErrorKind, ProcessError, RecordIssue};
pub use hash::{ContentHash, HashAlgorithm};
pub use record::{EntryKind, FileRecord};
pub use report::{ProcessReport, ProcessStats};
