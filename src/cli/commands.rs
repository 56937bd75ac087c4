//! CLI command implementations
//!
//! Loads configuration, wires the production collaborators (S3 CLI
//! store, systemd controller) and dispatches to the requested actions.
//! Multiple action flags run in order: backup, restore, rotate.

use std::path::Path;

use crate::cli::args::Cli;
use crate::cli::errors::{CliError, CliResult};
use crate::config::{RecoveryConfig, DEFAULT_CONFIG_PATH};
use crate::core::RecoveryContext;
use crate::observability::Logger;
use crate::remote::{ObjectStore, S3CliStore};
use crate::restore::{RestoreOrchestrator, SystemdController};
use crate::rotation;
use crate::workflow::RecoveryWorkflow;

/// Filesystem root restores unpack onto.
const RESTORE_ROOT: &str = "/";

/// Parse arguments and run the requested actions.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_with(&cli)
}

fn run_with(cli: &Cli) -> CliResult<()> {
    let explicit = cli.config.is_some();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.into());

    let config = RecoveryConfig::load(&config_path, explicit)
        .map_err(|e| CliError::config_error(e.to_string()))?;
    let ctx = RecoveryContext::new(config);

    let store = remote_store(&ctx);
    let store_ref: Option<&dyn ObjectStore> = store.as_ref().map(|s| s as &dyn ObjectStore);

    if cli.wants_full_workflow() {
        let report = RecoveryWorkflow::run(&ctx, store_ref)
            .map_err(|e| CliError::backup_failed(e.to_string()))?;
        println!(
            "{} ({}, rotated {})",
            report.artifact.path.display(),
            report.status.as_str(),
            report.rotated
        );
        return Ok(());
    }

    if cli.backup {
        let (artifact, warnings) = RecoveryWorkflow::create_backup(&ctx, store_ref)
            .map_err(|e| CliError::backup_failed(e.to_string()))?;
        if warnings.is_empty() {
            println!("{}", artifact.path.display());
        } else {
            println!("{} ({} warnings)", artifact.path.display(), warnings.len());
        }
    }

    if let Some(artifact) = &cli.restore {
        restore(&ctx, artifact)?;
    }

    if cli.rotate {
        let removed = rotation::rotate(
            &ctx.config.backup_directory,
            ctx.config.backup_retention_days,
            ctx.clock(),
        )
        .map_err(|e| CliError::rotate_failed(e.to_string()))?;
        println!("{} backups removed", removed);
    }

    Ok(())
}

fn restore(ctx: &RecoveryContext, artifact: &Path) -> CliResult<()> {
    let service = SystemdController::new();
    let outcome =
        RestoreOrchestrator::restore(ctx, artifact, Path::new(RESTORE_ROOT), &service)
            .map_err(|e| CliError::restore_failed(e.to_string()))?;
    println!(
        "restored {} ({})",
        artifact.display(),
        match outcome {
            crate::restore::RestoreOutcome::Completed => "completed",
            crate::restore::RestoreOutcome::CompletedWithWarnings => "completed with warnings",
        }
    );
    Ok(())
}

/// Build the production object store when replication is configured.
fn remote_store(ctx: &RecoveryContext) -> Option<S3CliStore> {
    if !ctx.config.remote_backup.enabled {
        return None;
    }
    Logger::trace(
        "REMOTE_STORE_CONFIGURED",
        &[("bucket", &ctx.config.remote_backup.bucket)],
    );
    Some(S3CliStore::from_config(&ctx.config.remote_backup))
}
