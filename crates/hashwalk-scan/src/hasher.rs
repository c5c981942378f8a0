//! Streaming content hashing.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::Md5;
use sha2::{Digest, Sha256};

use hashwalk_core::{ContentHash, EntryKind, HashAlgorithm, ProcessError};

/// Read buffer size for streaming hashes.
const HASH_BUF_SIZE: usize = 64 * 1024;

/// Incremental hasher over any supported algorithm.
enum StreamHasher {
    Md5(Md5),
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl StreamHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(Md5::new()),
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            Self::Md5(h) => h.update(bytes),
            Self::Sha256(h) => h.update(bytes),
            Self::Blake3(h) => {
                h.update(bytes);
            }
        }
    }

    fn finalize(self, algorithm: HashAlgorithm) -> ContentHash {
        match self {
            Self::Md5(h) => ContentHash::from_bytes(algorithm, &h.finalize()),
            Self::Sha256(h) => ContentHash::from_bytes(algorithm, &h.finalize()),
            Self::Blake3(h) => ContentHash::from_bytes(algorithm, h.finalize().as_bytes()),
        }
    }
}

/// Hash everything a reader yields.
pub fn hash_reader<R: Read>(mut reader: R, algorithm: HashAlgorithm) -> io::Result<ContentHash> {
    let mut hasher = StreamHasher::new(algorithm);
    let mut buffer = vec![0u8; HASH_BUF_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize(algorithm))
}

/// Hash an in-memory buffer.
pub fn hash_bytes(bytes: &[u8], algorithm: HashAlgorithm) -> ContentHash {
    let mut hasher = StreamHasher::new(algorithm);
    hasher.update(bytes);
    hasher.finalize(algorithm)
}

/// Compute the content hash of the file at `path`.
///
/// Returns `Ok(None)` when the path is a directory or another non-regular
/// entry. Not-found, permission and read errors are returned to the caller.
pub fn compute_hash(
    path: &Path,
    algorithm: HashAlgorithm,
) -> Result<Option<ContentHash>, ProcessError> {
    let metadata = std::fs::metadata(path).map_err(|e| ProcessError::io(path, e))?;
    if !metadata.is_file() {
        tracing::debug!(
            path = %path.display(),
            kind = ?EntryKind::from_metadata(&metadata),
            "skipping hash of non-regular entry"
        );
        return Ok(None);
    }

    warn_if_legacy(algorithm);

    let file = File::open(path).map_err(|e| ProcessError::io(path, e))?;
    hash_open_file(path, file, algorithm).map(|(hash, _)| hash)
}

/// Hash an already-open file, re-checking its type through the handle.
///
/// The metadata of the handle is returned alongside the hash so callers can
/// record size and mtime of exactly the content that was hashed.
pub(crate) fn hash_open_file(
    path: &Path,
    file: File,
    algorithm: HashAlgorithm,
) -> Result<(Option<ContentHash>, std::fs::Metadata), ProcessError> {
    let metadata = file.metadata().map_err(|e| ProcessError::io(path, e))?;
    if !metadata.is_file() {
        tracing::debug!(path = %path.display(), "entry is no longer a regular file");
        return Ok((None, metadata));
    }

    let hash = hash_reader(file, algorithm).map_err(|e| ProcessError::io(path, e))?;
    Ok((Some(hash), metadata))
}

pub(crate) fn warn_if_legacy(algorithm: HashAlgorithm) {
    if !algorithm.is_secure() {
        tracing::warn!(
            %algorithm,
            "legacy digest is not collision resistant; do not use it for integrity verification"
        );
    }
}
