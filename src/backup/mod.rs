//! Backup subsystem
//!
//! The archive builder walks the configured component paths and seals
//! them into one `kamailio_backup_<kind>_<YYYYMMDD_HHMMSS>.tar.gz`
//! artifact in the backup store.
//!
//! Guarantees:
//! - A missing component is a warning, never an abort.
//! - The artifact is written under a temporary name and renamed into
//!   place only after a successful close and fsync, so an interrupted
//!   run cannot leave a truncated file that looks like a valid artifact.
//! - On failure the partial output is removed before the error is
//!   surfaced; there is zero partial success.

mod archive;
mod checksum;
mod errors;

pub use checksum::{compute_file_checksum, format_checksum};
pub use errors::{BackupError, BackupErrorCode, BackupResult};

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::config::BackupKind;
use crate::core::RecoveryContext;
use crate::observability::Logger;

use archive::{cleanup_partial_archive, create_tar_gz};

/// One backup run's sealed output.
#[derive(Debug, Clone)]
pub struct BackupArtifact {
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub kind: BackupKind,
    pub encrypted: bool,
    pub size_bytes: u64,
}

/// Builds one sealed artifact per backup run.
pub struct ArchiveBuilder;

impl ArchiveBuilder {
    /// Create a backup artifact from the configured components.
    ///
    /// Incremental runs produce the same archive content as full runs;
    /// only the name tag differs. (A real incremental strategy would
    /// need a basis snapshot to diff against, which the store does not
    /// record.)
    pub fn create(ctx: &RecoveryContext) -> BackupResult<BackupArtifact> {
        let store = &ctx.config.backup_directory;
        fs::create_dir_all(store).map_err(|e| {
            BackupError::io_error(
                format!("Failed to create backup directory: {}", store.display()),
                e,
            )
        })?;

        let kind = ctx.config.backup_type;
        let name = ctx.next_artifact_name(kind);
        let final_path = store.join(&name);
        let partial_path = store.join(format!("{}.partial", name));

        let result = (|| -> BackupResult<u64> {
            create_tar_gz(&ctx.config.components_to_backup, &partial_path)?;

            fs::rename(&partial_path, &final_path).map_err(|e| {
                BackupError::io_error(
                    format!("Failed to publish artifact: {}", final_path.display()),
                    e,
                )
            })?;

            let size = fs::metadata(&final_path)
                .map_err(|e| BackupError::io_error_at_path(&final_path, e))?
                .len();
            Ok(size)
        })();

        let size_bytes = match result {
            Ok(size) => size,
            Err(e) => {
                cleanup_partial_archive(&partial_path);
                return Err(e);
            }
        };

        // Digest failure does not invalidate an already-sealed artifact.
        match compute_file_checksum(&final_path) {
            Ok(digest) => Logger::info(
                "BACKUP_CREATED",
                &[
                    ("path", &final_path.display().to_string()),
                    ("size_bytes", &size_bytes.to_string()),
                    ("checksum", &format_checksum(&digest)),
                ],
            ),
            Err(e) => Logger::warn(
                "BACKUP_CHECKSUM_FAILED",
                &[
                    ("path", &final_path.display().to_string()),
                    ("error", &e.to_string()),
                ],
            ),
        }

        Ok(BackupArtifact {
            path: final_path,
            created_at: ctx.now(),
            kind,
            encrypted: false,
            size_bytes,
        })
    }
}
