//! Gzipped tar creation for backup artifacts
//!
//! Components are stored under their base names only, so the archive
//! never leaks the absolute directory layout of the host it came from.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::Builder;

use crate::observability::Logger;

use super::errors::{BackupError, BackupResult};

/// Write a gzipped tar of `components` to `output_path`.
///
/// Duplicated component paths are walked once. A component that does
/// not exist on disk logs a COMPONENT_MISSING warning and is skipped;
/// it never aborts the archive. Returns the number of components that
/// made it into the archive.
///
/// The caller owns the output path lifecycle: this function may leave a
/// partially written file behind on error.
pub fn create_tar_gz(components: &[PathBuf], output_path: &Path) -> BackupResult<usize> {
    let file = File::create(output_path).map_err(|e| {
        BackupError::io_error(
            format!("Failed to create archive file: {}", output_path.display()),
            e,
        )
    })?;

    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = Builder::new(encoder);

    let mut seen: HashSet<&Path> = HashSet::new();
    let mut added = 0usize;

    for component in components {
        if !seen.insert(component.as_path()) {
            continue;
        }

        if !component.exists() {
            Logger::warn(
                "COMPONENT_MISSING",
                &[("component", &component.display().to_string())],
            );
            continue;
        }

        let base = match component.file_name() {
            Some(name) => PathBuf::from(name),
            None => {
                Logger::warn(
                    "COMPONENT_UNNAMED",
                    &[("component", &component.display().to_string())],
                );
                continue;
            }
        };

        let appended = if component.is_dir() {
            builder.append_dir_all(&base, component)
        } else {
            builder.append_path_with_name(component, &base)
        };
        appended.map_err(|e| {
            BackupError::io_error(
                format!("Failed to add component to archive: {}", component.display()),
                e,
            )
        })?;

        added += 1;
    }

    // Finish tar, then gzip, then flush and fsync the file so the
    // rename that follows publishes a fully durable artifact.
    let encoder = builder.into_inner().map_err(|e| {
        BackupError::io_error("Failed to finish archive", e)
    })?;
    let writer = encoder.finish().map_err(|e| {
        BackupError::io_error("Failed to finish gzip stream", e)
    })?;
    let file = writer.into_inner().map_err(|e| {
        BackupError::io_error("Failed to flush archive buffer", e.into_error())
    })?;
    file.sync_all().map_err(|e| {
        BackupError::io_error(
            format!("Failed to fsync archive: {}", output_path.display()),
            e,
        )
    })?;

    Ok(added)
}

/// Delete a partial archive if it exists.
pub fn cleanup_partial_archive(path: &Path) {
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }
}
