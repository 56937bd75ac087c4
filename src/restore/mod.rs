//! Restore subsystem
//!
//! Reverses a backup: decrypt the artifact if its name marks it as
//! encrypted, unpack the tarball onto the restore root, then restart
//! the Kamailio service.
//!
//! Stage machine: Decrypting -> Unpacking -> RestartingService.
//! No stage is resumable; a failed restore is re-run from the start
//! with the same artifact.
//!
//! Unpacking overwrites existing files at the same relative paths and
//! is deliberately destructive; a failure mid-unpack can leave a
//! partially applied tree. A failed service restart does not roll back
//! the already-applied files, it leaves the system in "files restored,
//! service not confirmed running" and reports completed-with-warnings.

mod errors;
mod service;

pub use errors::{RestoreError, RestoreErrorCode, RestoreResult, RestoreStage};
pub use service::{ServiceController, SystemdController, DEFAULT_RESTART_TIMEOUT};

use std::fs::File;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::core::RecoveryContext;
use crate::encryption::{is_encrypted_name, passphrase_from_env, Cipher};
use crate::observability::Logger;

/// The service restarted after a successful unpack.
pub const SERVICE_NAME: &str = "kamailio";

/// Terminal restore outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Files restored and service confirmed restarted.
    Completed,
    /// Files restored but the service restart failed; operator
    /// follow-up required.
    CompletedWithWarnings,
}

/// Runs the restore stage machine over one artifact.
pub struct RestoreOrchestrator;

impl RestoreOrchestrator {
    /// Restore `artifact` onto `restore_root` and restart the service.
    ///
    /// Decrypt and unpack failures are fatal and abort the restore;
    /// a decrypt failure aborts before the filesystem is touched.
    pub fn restore(
        ctx: &RecoveryContext,
        artifact: &Path,
        restore_root: &Path,
        service: &dyn ServiceController,
    ) -> RestoreResult<RestoreOutcome> {
        // Stage 1: Decrypting
        let plaintext = if is_encrypted_name(artifact) {
            Logger::info(
                "RESTORE_DECRYPTING",
                &[("artifact", &artifact.display().to_string())],
            );
            let passphrase = passphrase_from_env(&ctx.config.encryption.passphrase_env);
            Cipher::decrypt_file(artifact, &passphrase)
                .map_err(|e| RestoreError::decrypt_failed(e.to_string()))?
        } else {
            artifact.to_path_buf()
        };

        // Stage 2: Unpacking
        Logger::info(
            "RESTORE_UNPACKING",
            &[
                ("artifact", &plaintext.display().to_string()),
                ("root", &restore_root.display().to_string()),
            ],
        );
        unpack_archive(&plaintext, restore_root)?;

        // Stage 3: RestartingService
        let outcome = match service.restart(SERVICE_NAME) {
            Ok(0) => {
                Logger::info("RESTORE_SERVICE_RESTARTED", &[("service", SERVICE_NAME)]);
                RestoreOutcome::Completed
            }
            Ok(code) => {
                Logger::warn(
                    "RESTORE_SERVICE_RESTART_FAILED",
                    &[("service", SERVICE_NAME), ("exit_code", &code.to_string())],
                );
                RestoreOutcome::CompletedWithWarnings
            }
            Err(e) => {
                Logger::warn(
                    "RESTORE_SERVICE_RESTART_FAILED",
                    &[("service", SERVICE_NAME), ("error", &e.to_string())],
                );
                RestoreOutcome::CompletedWithWarnings
            }
        };

        Logger::info(
            "RESTORE_COMPLETED",
            &[
                ("artifact", &artifact.display().to_string()),
                (
                    "status",
                    match outcome {
                        RestoreOutcome::Completed => "completed",
                        RestoreOutcome::CompletedWithWarnings => "completed_with_warnings",
                    },
                ),
            ],
        );

        Ok(outcome)
    }
}

fn unpack_archive(artifact: &Path, restore_root: &Path) -> RestoreResult<()> {
    let file = File::open(artifact).map_err(|e| {
        RestoreError::unpack_failed_with_source(
            format!("Failed to open artifact: {}", artifact.display()),
            e,
        )
    })?;

    let mut archive = Archive::new(GzDecoder::new(file));
    // Existing files at the same relative paths are replaced.
    archive.set_overwrite(true);
    archive.unpack(restore_root).map_err(|e| {
        RestoreError::unpack_failed_with_source(
            format!("Failed to unpack artifact: {}", artifact.display()),
            e,
        )
    })?;

    Ok(())
}
