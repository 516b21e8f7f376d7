//! Content checksums for downloaded media files
//!
//! Ingestion is at-least-once: a crash between appending a record and
//! persisting the checkpoint can re-deliver a message whose media file is
//! already on disk. Digests let the media store detect that case instead of
//! rewriting the file.

use crate::error::{MdpError, Result};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Compute the SHA-256 digest of a byte slice, hex-encoded.
pub fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Compute the SHA-256 digest of a file, hex-encoded.
pub fn sha256_file(path: impl AsRef<Path>) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    sha256_reader(&mut file)
}

/// Compute the SHA-256 digest of any readable source, hex-encoded.
pub fn sha256_reader<R: Read>(reader: &mut R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Verify that a file's content matches the expected digest.
///
/// Returns `Ok(())` on match, `MdpError::ChecksumMismatch` otherwise.
pub fn verify_file(path: impl AsRef<Path>, expected: &str) -> Result<()> {
    let actual = sha256_file(path)?;
    if actual == expected {
        Ok(())
    } else {
        Err(MdpError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}
