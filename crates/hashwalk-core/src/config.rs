//! Processor configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::hash::HashAlgorithm;

/// Configuration for one processing run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ProcessorConfig {
    /// Root path to enumerate.
    pub root: PathBuf,

    /// Yield directory entries alongside regular files.
    #[builder(default = "false")]
    #[serde(default)]
    pub include_dirs: bool,

    /// Digest algorithm for content hashes.
    #[builder(default)]
    #[serde(default)]
    pub algorithm: HashAlgorithm,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Maximum depth to traverse (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// File extensions to keep, e.g. `["rs", ".py"]` (empty = all files).
    #[builder(default)]
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Glob patterns matched against entry names; matching directories are pruned.
    #[builder(default)]
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Process records on the rayon pool instead of sequentially.
    #[builder(default = "false")]
    #[serde(default)]
    pub parallel: bool,
}

fn default_true() -> bool {
    true
}

impl ProcessorConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl ProcessorConfig {
    /// Create a new processor config builder.
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::default()
    }

    /// Create a simple config for processing a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_dirs: false,
            algorithm: HashAlgorithm::default(),
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
            extensions: Vec::new(),
            exclude_patterns: Vec::new(),
            parallel: false,
        }
    }

    /// Check whether a file passes the extension filter.
    pub fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
