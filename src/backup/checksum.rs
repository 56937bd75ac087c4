//! SHA-256 checksums for sealed artifacts
//!
//! Every finished artifact gets a digest logged alongside its creation
//! event so an operator can verify a copy (local or replicated) against
//! the run log.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::errors::{BackupError, BackupResult};

/// Compute the SHA-256 digest of a file, reading in chunks.
pub fn compute_file_checksum(path: &Path) -> BackupResult<[u8; 32]> {
    let file = File::open(path).map_err(|e| BackupError::io_error_at_path(path, e))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buffer)
            .map_err(|e| BackupError::io_error_at_path(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize().into())
}

/// Format a digest as `sha256:<64 lowercase hex chars>`.
pub fn format_checksum(digest: &[u8; 32]) -> String {
    let mut out = String::with_capacity(7 + 64);
    out.push_str("sha256:");
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}
