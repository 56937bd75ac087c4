//! Retention reaper for the backup store
//!
//! Deletes artifacts strictly older than the retention window, by file
//! modification time. This is a best-effort maintenance pass, not a
//! transaction: per-entry failures are logged and skipped, and a file
//! that vanishes between scan and delete counts as already reaped.

mod errors;

pub use errors::{RotationError, RotationErrorCode, RotationResult};

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use crate::core::Clock;
use crate::observability::Logger;

/// Remove store entries whose mtime is strictly older than
/// `now - retention_days`. An entry aged exactly the retention window
/// is retained. A store directory that does not exist yet counts as
/// empty. Returns the number of entries removed.
pub fn rotate(store: &Path, retention_days: u32, clock: &dyn Clock) -> RotationResult<usize> {
    let cutoff = clock.now() - Duration::days(i64::from(retention_days));

    let entries = match fs::read_dir(store) {
        Ok(entries) => entries,
        // A store that was never written has nothing to reap.
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Logger::info(
                "ROTATE_STORE_MISSING",
                &[("store", &store.display().to_string())],
            );
            return Ok(0);
        }
        Err(e) => {
            return Err(RotationError::scan_failed(
                format!("Failed to scan backup store: {}", store.display()),
                e,
            ))
        }
    };

    let mut removed = 0usize;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                Logger::warn(
                    "ROTATE_ENTRY_UNREADABLE",
                    &[("store", &store.display().to_string()), ("error", &e.to_string())],
                );
                continue;
            }
        };
        let path = entry.path();

        let modified = match entry.metadata().and_then(|m| {
            if m.is_file() {
                m.modified().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(modified)) => DateTime::<Utc>::from(modified),
            Ok(None) => continue,
            Err(e) => {
                Logger::warn(
                    "ROTATE_ENTRY_UNREADABLE",
                    &[("path", &path.display().to_string()), ("error", &e.to_string())],
                );
                continue;
            }
        };

        if modified >= cutoff {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                Logger::info(
                    "BACKUP_ROTATED",
                    &[("path", &path.display().to_string())],
                );
                removed += 1;
            }
            // A concurrent reaper or operator got there first.
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                Logger::warn(
                    "ROTATE_ENTRY_FAILED",
                    &[("path", &path.display().to_string()), ("error", &e.to_string())],
                );
            }
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use std::fs::File;
    use std::path::PathBuf;
    use std::time::SystemTime;
    use tempfile::TempDir;

    /// Create a store entry and age it by backdating its mtime.
    fn aged_entry(store: &Path, name: &str, age_days: i64, now: SystemTime) -> PathBuf {
        let path = store.join(name);
        fs::write(&path, b"artifact").unwrap();
        let mtime = now - std::time::Duration::from_secs(age_days as u64 * 86_400);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
        path
    }

    #[test]
    fn test_rotate_removes_only_expired_entries() {
        let temp = TempDir::new().unwrap();
        let now = SystemTime::now();
        let clock = FixedClock(DateTime::<Utc>::from(now));

        for (name, age) in [
            ("age10.tar.gz", 10),
            ("age29.tar.gz", 29),
            ("age30.tar.gz", 30),
            ("age31.tar.gz", 31),
            ("age45.tar.gz", 45),
        ] {
            aged_entry(temp.path(), name, age, now);
        }

        let removed = rotate(temp.path(), 30, &clock).unwrap();
        assert_eq!(removed, 2);

        assert!(temp.path().join("age10.tar.gz").exists());
        assert!(temp.path().join("age29.tar.gz").exists());
        assert!(temp.path().join("age30.tar.gz").exists());
        assert!(!temp.path().join("age31.tar.gz").exists());
        assert!(!temp.path().join("age45.tar.gz").exists());
    }

    #[test]
    fn test_boundary_entry_is_retained() {
        // Strict inequality: an entry aged exactly the window stays.
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("boundary.tar.gz");
        fs::write(&path, b"artifact").unwrap();

        let mtime = fs::metadata(&path).unwrap().modified().unwrap();
        let clock = FixedClock(DateTime::<Utc>::from(mtime) + Duration::days(30));

        let removed = rotate(temp.path(), 30, &clock).unwrap();
        assert_eq!(removed, 0);
        assert!(path.exists());

        // One second past the boundary and it goes.
        let clock = FixedClock(
            DateTime::<Utc>::from(mtime) + Duration::days(30) + Duration::seconds(1),
        );
        let removed = rotate(temp.path(), 30, &clock).unwrap();
        assert_eq!(removed, 1);
        assert!(!path.exists());
    }

    #[test]
    fn test_rotate_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let now = SystemTime::now();
        let clock = FixedClock(DateTime::<Utc>::from(now));

        aged_entry(temp.path(), "old.tar.gz", 60, now);
        aged_entry(temp.path(), "fresh.tar.gz", 1, now);

        let first = rotate(temp.path(), 30, &clock).unwrap();
        let second = rotate(temp.path(), 30, &clock).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 0);
        assert!(temp.path().join("fresh.tar.gz").exists());
    }

    #[test]
    fn test_rotate_skips_directories() {
        let temp = TempDir::new().unwrap();
        let now = SystemTime::now();
        let clock = FixedClock(DateTime::<Utc>::from(now) + Duration::days(365));

        fs::create_dir(temp.path().join("subdir")).unwrap();
        aged_entry(temp.path(), "old.tar.gz", 60, now);

        let removed = rotate(temp.path(), 30, &clock).unwrap();
        assert_eq!(removed, 1);
        assert!(temp.path().join("subdir").exists());
    }

    #[test]
    fn test_rotate_empty_store() {
        let temp = TempDir::new().unwrap();
        let clock = FixedClock(Utc::now());
        assert_eq!(rotate(temp.path(), 30, &clock).unwrap(), 0);
    }

    #[test]
    fn test_missing_store_rotates_nothing() {
        // A fresh host has no store directory until the first backup;
        // rotation reports zero removed, not an error.
        let temp = TempDir::new().unwrap();
        let clock = FixedClock(Utc::now());
        assert_eq!(rotate(&temp.path().join("nope"), 30, &clock).unwrap(), 0);
    }

    #[test]
    fn test_zero_retention_removes_anything_older_than_now() {
        let temp = TempDir::new().unwrap();
        let now = SystemTime::now();
        aged_entry(temp.path(), "old.tar.gz", 1, now);

        let clock = FixedClock(DateTime::<Utc>::from(now));
        let removed = rotate(temp.path(), 0, &clock).unwrap();
        assert_eq!(removed, 1);
    }
}
