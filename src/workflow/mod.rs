//! Recovery workflow
//!
//! One scheduled or on-demand run: archive builder, then the encryption
//! gate, then remote replication, then the retention reaper. Only an
//! archive-build failure fails the run; every later stage degrades to a
//! warning and the run carries on with weaker guarantees (unencrypted,
//! unreplicated, or unrotated).

use crate::backup::{ArchiveBuilder, BackupArtifact, BackupError};
use crate::core::RecoveryContext;
use crate::encryption::{passphrase_from_env, ArtifactSealer, Cipher};
use crate::observability::Logger;
use crate::remote::ObjectStore;
use crate::rotation;

/// Result type for workflow runs. The only fatal failure in a run is
/// the archive build, so runs surface backup errors directly.
pub type WorkflowResult<T> = Result<T, BackupError>;

/// Terminal status of one workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    SuccessWithWarnings,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::SuccessWithWarnings => "success_with_warnings",
        }
    }
}

/// What one workflow run produced.
#[derive(Debug)]
pub struct RunReport {
    pub artifact: BackupArtifact,
    pub warnings: Vec<String>,
    pub rotated: usize,
    pub status: RunStatus,
}

/// Composes the backup stages into one run.
pub struct RecoveryWorkflow;

impl RecoveryWorkflow {
    /// Create one backup artifact: build, then optionally encrypt and
    /// replicate. Encryption and upload failures are recorded as
    /// warnings, never propagated.
    pub fn create_backup(
        ctx: &RecoveryContext,
        store: Option<&dyn ObjectStore>,
    ) -> WorkflowResult<(BackupArtifact, Vec<String>)> {
        Self::create_backup_with(ctx, store, &Cipher)
    }

    /// [`create_backup`](Self::create_backup) with an injected sealer.
    pub fn create_backup_with(
        ctx: &RecoveryContext,
        store: Option<&dyn ObjectStore>,
        sealer: &dyn ArtifactSealer,
    ) -> WorkflowResult<(BackupArtifact, Vec<String>)> {
        let mut warnings = Vec::new();

        let mut artifact = ArchiveBuilder::create(ctx)?;

        if ctx.config.encryption.enabled {
            let passphrase = passphrase_from_env(&ctx.config.encryption.passphrase_env);
            match sealer.seal(&artifact.path, &passphrase) {
                Ok(encrypted_path) => {
                    artifact.size_bytes = std::fs::metadata(&encrypted_path)
                        .map(|m| m.len())
                        .unwrap_or(artifact.size_bytes);
                    artifact.path = encrypted_path;
                    artifact.encrypted = true;
                    Logger::info(
                        "BACKUP_ENCRYPTED",
                        &[("path", &artifact.path.display().to_string())],
                    );
                }
                Err(e) => {
                    // The plaintext artifact stays the artifact of record.
                    Logger::warn(
                        "BACKUP_ENCRYPTION_FAILED",
                        &[
                            ("path", &artifact.path.display().to_string()),
                            ("error", &e.to_string()),
                        ],
                    );
                    warnings.push(format!("encryption failed: {}", e));
                }
            }
        }

        if ctx.config.remote_backup.enabled {
            let bucket = &ctx.config.remote_backup.bucket;
            let upload = match store {
                Some(store) => store.put(&artifact.path, bucket),
                None => Err(crate::remote::RemoteError::upload_failed(
                    "remote backup enabled but no object store is configured",
                )),
            };
            match upload {
                Ok(()) => Logger::info(
                    "BACKUP_REPLICATED",
                    &[
                        ("path", &artifact.path.display().to_string()),
                        ("bucket", bucket),
                    ],
                ),
                Err(e) => {
                    Logger::warn(
                        "BACKUP_REPLICATION_FAILED",
                        &[
                            ("path", &artifact.path.display().to_string()),
                            ("bucket", bucket),
                            ("error", &e.to_string()),
                        ],
                    );
                    warnings.push(format!("replication failed: {}", e));
                }
            }
        }

        Ok((artifact, warnings))
    }

    /// The full disaster-recovery run: create a backup, then reap
    /// expired artifacts. Fails only if the archive cannot be built.
    pub fn run(
        ctx: &RecoveryContext,
        store: Option<&dyn ObjectStore>,
    ) -> WorkflowResult<RunReport> {
        Self::run_with(ctx, store, &Cipher)
    }

    /// [`run`](Self::run) with an injected sealer.
    pub fn run_with(
        ctx: &RecoveryContext,
        store: Option<&dyn ObjectStore>,
        sealer: &dyn ArtifactSealer,
    ) -> WorkflowResult<RunReport> {
        let (artifact, mut warnings) = match Self::create_backup_with(ctx, store, sealer) {
            Ok(result) => result,
            Err(e) => {
                Logger::error("RUN_FAILED", &[("error", &e.to_string())]);
                return Err(e);
            }
        };

        let rotated = match rotation::rotate(
            &ctx.config.backup_directory,
            ctx.config.backup_retention_days,
            ctx.clock(),
        ) {
            Ok(rotated) => rotated,
            Err(e) => {
                Logger::warn("ROTATION_FAILED", &[("error", &e.to_string())]);
                warnings.push(format!("rotation failed: {}", e));
                0
            }
        };

        let status = if warnings.is_empty() {
            RunStatus::Success
        } else {
            RunStatus::SuccessWithWarnings
        };

        Logger::info(
            "RUN_COMPLETED",
            &[
                ("artifact", &artifact.path.display().to_string()),
                ("rotated", &rotated.to_string()),
                ("status", status.as_str()),
                ("warnings", &warnings.len().to_string()),
            ],
        );

        Ok(RunReport {
            artifact,
            warnings,
            rotated,
            status,
        })
    }
}
