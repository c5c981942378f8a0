//! Error types for listing and processing operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while listing or processing files.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// A directory was found where file content was expected.
    #[error("Is a directory: {path}")]
    IsADirectory { path: PathBuf },

    /// Any other I/O failure while reading an entry.
    #[error("Unreadable entry at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ProcessError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match ErrorKind::from_io(&source) {
            ErrorKind::NotFound => Self::NotFound { path },
            ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            ErrorKind::IsADirectory => Self::IsADirectory { path },
            ErrorKind::Unreadable => Self::Unreadable { path, source },
        }
    }

    /// Kind of this error, if it is tied to a filesystem entry.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::NotFound { .. } => Some(ErrorKind::NotFound),
            Self::PermissionDenied { .. } => Some(ErrorKind::PermissionDenied),
            Self::IsADirectory { .. } => Some(ErrorKind::IsADirectory),
            Self::Unreadable { .. } => Some(ErrorKind::Unreadable),
            Self::InvalidConfig { .. } => None,
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::IsADirectory { path }
            | Self::Unreadable { path, .. } => Some(path),
            Self::InvalidConfig { .. } => None,
        }
    }
}

/// Kind of per-entry failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Entry vanished or never existed.
    NotFound,
    /// Entry could not be opened or stat'ed.
    PermissionDenied,
    /// Content was requested from a directory.
    IsADirectory,
    /// Any other read failure.
    Unreadable,
}

impl ErrorKind {
    /// Classify a raw I/O error.
    pub fn from_io(error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::IsADirectory => Self::IsADirectory,
            _ => Self::Unreadable,
        }
    }
}

/// Non-fatal failure attached to a degraded record or a skipped walk entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordIssue {
    /// Kind of failure.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl RecordIssue {
    /// Create a new record issue.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create an issue from a raw I/O error, classifying it by kind.
    pub fn from_io(path: &Path, error: &std::io::Error) -> Self {
        Self::new(
            ErrorKind::from_io(error),
            format!("{}: {error}", path.display()),
        )
    }
}

impl From<&ProcessError> for RecordIssue {
    fn from(err: &ProcessError) -> Self {
        Self::new(err.kind().unwrap_or(ErrorKind::Unreadable), err.to_string())
    }
}
