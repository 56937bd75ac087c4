//! Remote replication of backup artifacts
//!
//! Copies a finished artifact to an off-host object-storage target.
//! The production implementation shells out to the `aws` CLI with the
//! configured credentials; tests substitute an in-memory store.

mod errors;

pub use errors::{RemoteError, RemoteErrorCode, RemoteResult};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::RemoteConfig;
use crate::core::{run_with_timeout, ProcessOutcome};

/// Default bound on one upload invocation.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Narrow object-storage capability: put one local file under a bucket.
pub trait ObjectStore {
    fn put(&self, artifact: &Path, bucket: &str) -> RemoteResult<()>;
}

/// Object store backed by the `aws s3 cp` CLI.
///
/// Credentials are injected through the child's environment, never
/// through argv, so they do not show up in the process table.
pub struct S3CliStore {
    access_key: String,
    secret_key: String,
    timeout: Duration,
}

impl S3CliStore {
    pub fn from_config(remote: &RemoteConfig) -> Self {
        Self {
            access_key: remote.access_key.clone(),
            secret_key: remote.secret_key.clone(),
            timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ObjectStore for S3CliStore {
    fn put(&self, artifact: &Path, bucket: &str) -> RemoteResult<()> {
        let mut command = Command::new("aws");
        command
            .arg("s3")
            .arg("cp")
            .arg(artifact)
            .arg(format!("s3://{}/", bucket))
            .env("AWS_ACCESS_KEY_ID", &self.access_key)
            .env("AWS_SECRET_ACCESS_KEY", &self.secret_key);

        let outcome = run_with_timeout(&mut command, self.timeout).map_err(|e| {
            RemoteError::upload_failed_with_source("Failed to spawn aws CLI", e)
        })?;

        match outcome {
            ProcessOutcome::Exited(0) => Ok(()),
            ProcessOutcome::Exited(code) => Err(RemoteError::upload_failed(format!(
                "aws s3 cp exited with code {} for {}",
                code,
                artifact.display()
            ))),
            ProcessOutcome::TimedOut => Err(RemoteError::timed_out(format!(
                "aws s3 cp exceeded {}s for {}",
                self.timeout.as_secs(),
                artifact.display()
            ))),
        }
    }
}

/// In-memory object store used as a test double.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object keys currently held, as `<bucket>/<file name>`.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl ObjectStore for MemoryStore {
    fn put(&self, artifact: &Path, bucket: &str) -> RemoteResult<()> {
        let bytes = std::fs::read(artifact).map_err(|e| {
            RemoteError::upload_failed_with_source(
                format!("Failed to read artifact: {}", artifact.display()),
                e,
            )
        })?;
        let name = PathBuf::from(artifact)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| RemoteError::upload_failed("Artifact path has no file name"))?;
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(format!("{}/{}", bucket, name), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_put_and_read_back() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("kamailio_backup_full_20260827_090000.tar.gz");
        std::fs::write(&artifact, b"sealed").unwrap();

        let store = MemoryStore::new();
        store.put(&artifact, "kamailio-dr").unwrap();

        assert_eq!(
            store.keys(),
            vec!["kamailio-dr/kamailio_backup_full_20260827_090000.tar.gz".to_string()]
        );
        assert_eq!(
            store
                .object("kamailio-dr/kamailio_backup_full_20260827_090000.tar.gz")
                .unwrap(),
            b"sealed"
        );
    }

    #[test]
    fn test_memory_store_missing_artifact_is_upload_failure() {
        let store = MemoryStore::new();
        let err = store
            .put(Path::new("/nonexistent/a.tar.gz"), "bucket")
            .unwrap_err();
        assert_eq!(err.code(), RemoteErrorCode::KamRemoteUpload);
    }

    #[test]
    fn test_s3_store_carries_config_credentials() {
        let remote = RemoteConfig {
            enabled: true,
            kind: "s3".to_string(),
            bucket: "b".to_string(),
            access_key: "AK".to_string(),
            secret_key: "SK".to_string(),
        };
        let store = S3CliStore::from_config(&remote).with_timeout(Duration::from_secs(1));
        assert_eq!(store.access_key, "AK");
        assert_eq!(store.secret_key, "SK");
        assert_eq!(store.timeout, Duration::from_secs(1));
    }
}
