//! Hash algorithm selection and digest values.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Digest algorithm used for content hashes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5. Kept for compatibility with existing checksum lists only;
    /// collisions are practical, so it must not be used for integrity checks.
    #[strum(to_string = "md5", serialize = "legacy")]
    Md5,
    /// SHA-256.
    #[default]
    #[strum(to_string = "sha256", serialize = "sha-256")]
    Sha256,
    /// BLAKE3 (32-byte output).
    #[strum(to_string = "blake3")]
    Blake3,
}

impl HashAlgorithm {
    /// Length of the raw digest in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha256 | Self::Blake3 => 32,
        }
    }

    /// Length of the hex-encoded digest.
    pub fn hex_len(self) -> usize {
        self.digest_len() * 2
    }

    /// Whether the algorithm is collision resistant.
    pub fn is_secure(self) -> bool {
        !matches!(self, Self::Md5)
    }
}

/// Content digest of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash {
    /// Algorithm that produced the digest.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub hex: String,
}

impl ContentHash {
    /// Create a hash from raw digest bytes.
    pub fn from_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            hex: bytes.iter().map(|b| format!("{b:02x}")).collect(),
        }
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}
