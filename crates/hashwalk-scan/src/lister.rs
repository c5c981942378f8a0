//! Lazy directory listing on top of jwalk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use jwalk::{DirEntryIter, Parallelism, WalkDir};

use hashwalk_core::{ErrorKind, ProcessError, ProcessorConfig, RecordIssue};

/// Entry skipped during the walk because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkWarning {
    /// Path of the unreadable entry (empty if jwalk did not report one).
    pub path: PathBuf,
    /// What went wrong.
    pub issue: RecordIssue,
}

/// Builds [`FileList`]s from a processor configuration.
#[derive(Debug, Clone)]
pub struct FileLister {
    config: ProcessorConfig,
}

impl FileLister {
    /// Create a lister for the given configuration.
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    /// Start listing.
    ///
    /// The root is checked eagerly: a missing or unreadable root is an error.
    /// Everything below it is read lazily as the returned iterator advances.
    pub fn list(&self) -> Result<FileList, ProcessError> {
        let root = self.config.root.as_path();
        let metadata = std::fs::metadata(root).map_err(|e| ProcessError::io(root, e))?;

        if metadata.is_file() {
            return Ok(FileList::single(root.to_path_buf()));
        }
        if !metadata.is_dir() {
            return Err(ProcessError::io(
                root,
                std::io::Error::other("root is neither a file nor a directory"),
            ));
        }

        // jwalk reports an unreadable root as an item, not an error.
        std::fs::read_dir(root).map_err(|e| ProcessError::io(root, e))?;

        let excludes = Arc::new(build_glob_set(&self.config.exclude_patterns)?);
        let parallelism = if self.config.parallel {
            Parallelism::RayonDefaultPool {
                busy_timeout: std::time::Duration::from_millis(100),
            }
        } else {
            Parallelism::Serial
        };

        let walker = WalkDir::new(root)
            .parallelism(parallelism)
            .sort(true)
            .skip_hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .max_depth(
                self.config
                    .max_depth
                    .map(|d| d as usize)
                    .unwrap_or(usize::MAX),
            )
            .process_read_dir(move |_depth, _path, _state, children| {
                if excludes.is_empty() {
                    return;
                }
                children.retain(|child| match child {
                    Ok(entry) => !excludes.is_match(Path::new(entry.file_name())),
                    Err(_) => true,
                });
            });

        Ok(FileList {
            source: Source::Walk(walker.into_iter()),
            config: self.config.clone(),
            warnings: Vec::new(),
        })
    }
}

/// List entries under `root`.
///
/// With `include_dirs = false` only regular files are yielded; with `true`
/// directories are yielded too. The root itself is never yielded.
pub fn list_files(root: impl Into<PathBuf>, include_dirs: bool) -> Result<FileList, ProcessError> {
    let mut config = ProcessorConfig::new(root);
    config.include_dirs = include_dirs;
    FileLister::new(config).list()
}

enum Source {
    Single(Option<PathBuf>),
    Walk(DirEntryIter<((), ())>),
}

/// Lazy sequence of enumerated paths.
pub struct FileList {
    source: Source,
    config: ProcessorConfig,
    warnings: Vec<WalkWarning>,
}

impl FileList {
    fn single(path: PathBuf) -> Self {
        Self {
            source: Source::Single(Some(path)),
            config: ProcessorConfig::default(),
            warnings: Vec::new(),
        }
    }

    /// Entries skipped so far because they could not be read.
    pub fn warnings(&self) -> &[WalkWarning] {
        &self.warnings
    }

    /// Consume the list, returning the skipped-entry warnings.
    pub fn into_warnings(self) -> Vec<WalkWarning> {
        self.warnings
    }
}

impl Iterator for FileList {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let Self {
            source,
            config,
            warnings,
        } = self;
        let walker = match source {
            Source::Single(path) => return path.take(),
            Source::Walk(walker) => walker,
        };

        for entry_result in walker.by_ref() {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    warnings.push(walk_warning(&err, Path::new("")));
                    continue;
                }
            };

            let path = entry.path();
            let file_type = entry.file_type();

            // jwalk yields a directory it could not read as a normal entry.
            if let Some(err) = entry.read_children_error.as_ref() {
                warnings.push(walk_warning(err, &path));
            }

            if file_type.is_dir() {
                if config.include_dirs {
                    return Some(path);
                }
            } else if file_type.is_file() {
                if config.matches_extension(&path) {
                    return Some(path);
                }
            } else {
                tracing::debug!(path = %path.display(), "skipping non-regular entry");
            }
        }

        None
    }
}

/// Log a walk error and turn it into a warning.
fn walk_warning(err: &jwalk::Error, fallback: &Path) -> WalkWarning {
    let path = err.path().unwrap_or(fallback).to_path_buf();
    let issue = match err.io_error() {
        Some(io_err) => RecordIssue::from_io(&path, io_err),
        None => RecordIssue::new(ErrorKind::Unreadable, err.to_string()),
    };
    tracing::warn!(path = %path.display(), error = %issue.message, "skipping unreadable entry");
    WalkWarning { path, issue }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ProcessError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ProcessError::InvalidConfig {
            message: format!("bad exclude pattern {pattern:?}: {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ProcessError::InvalidConfig {
        message: e.to_string(),
    })
}
