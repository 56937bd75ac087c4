//! Recovery configuration
//!
//! Typed settings for the disaster-recovery subsystem, loaded from a
//! JSON file. The four base keys (`backup_directory`,
//! `backup_retention_days`, `backup_type`, `components_to_backup`) are
//! required whenever a file is present; the remote and encryption
//! blocks have defaults and may be omitted.
//!
//! A missing file falls back to built-in defaults. Malformed content is
//! fatal when the operator named the file explicitly, and defaults with
//! a logged error otherwise. Loading never panics.

mod errors;

pub use errors::{ConfigError, ConfigErrorCode, ConfigResult};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::Logger;

/// Default config file location on a Kamailio host.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/kamailio/disaster_recovery.json";

/// Environment variable holding the artifact passphrase by default.
pub const DEFAULT_PASSPHRASE_ENV: &str = "BACKUP_ENCRYPTION_KEY";

/// Backup kind tag embedded in artifact names.
///
/// Incremental backups are currently aliased to full backups downstream;
/// the tag is still carried through to the artifact name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupKind {
    Full,
    Incremental,
}

impl BackupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupKind::Full => "full",
            BackupKind::Incremental => "incremental",
        }
    }
}

/// Offsite replication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Provider tag; only "s3" is supported.
    #[serde(rename = "type", default = "default_remote_kind")]
    pub kind: String,

    #[serde(default)]
    pub bucket: String,

    #[serde(default)]
    pub access_key: String,

    #[serde(default)]
    pub secret_key: String,
}

fn default_remote_kind() -> String {
    "s3".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: default_remote_kind(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

/// Artifact encryption settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Method tag; only "passphrase" is supported.
    #[serde(default = "default_encryption_method")]
    pub method: String,

    /// Name of the environment variable holding the passphrase.
    #[serde(default = "default_passphrase_env")]
    pub passphrase_env: String,
}

fn default_encryption_method() -> String {
    "passphrase".to_string()
}

fn default_passphrase_env() -> String {
    DEFAULT_PASSPHRASE_ENV.to_string()
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            // Enabled by default, matching the deployed behavior this
            // tool replaces.
            enabled: true,
            method: default_encryption_method(),
            passphrase_env: default_passphrase_env(),
        }
    }
}

/// Immutable per-run recovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Backup store directory; created on first use if absent.
    pub backup_directory: PathBuf,

    /// Retention window in days; artifacts strictly older are reaped.
    pub backup_retention_days: u32,

    pub backup_type: BackupKind,

    /// Ordered component paths; duplicates are deduplicated at walk time.
    pub components_to_backup: Vec<PathBuf>,

    #[serde(default)]
    pub remote_backup: RemoteConfig,

    #[serde(default)]
    pub encryption: EncryptionConfig,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            backup_directory: PathBuf::from("/var/backups/kamailio"),
            backup_retention_days: 30,
            backup_type: BackupKind::Full,
            components_to_backup: vec![
                PathBuf::from("/etc/kamailio"),
                PathBuf::from("/var/lib/kamailio"),
                PathBuf::from("/var/log/kamailio"),
            ],
            remote_backup: RemoteConfig::default(),
            encryption: EncryptionConfig::default(),
        }
    }
}

impl RecoveryConfig {
    /// Load configuration from `path`.
    ///
    /// `explicit` marks a path the operator named on the command line.
    /// A missing file always falls back to built-in defaults. Malformed
    /// content or a missing base key is a hard error when `explicit`,
    /// and defaults-with-a-logged-error otherwise; loading never panics.
    pub fn load(path: &Path, explicit: bool) -> ConfigResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Logger::warn(
                    "CONFIG_NOT_FOUND",
                    &[("path", &path.display().to_string())],
                );
                return Ok(Self::default());
            }
            Err(e) => {
                if explicit {
                    return Err(ConfigError::io_error(
                        format!("Failed to read config: {}", path.display()),
                        e,
                    ));
                }
                Logger::error(
                    "CONFIG_READ_FAILED",
                    &[("path", &path.display().to_string()), ("error", &e.to_string())],
                );
                return Ok(Self::default());
            }
        };

        match serde_json::from_str::<RecoveryConfig>(&text) {
            Ok(config) => {
                config.validate()?;
                Ok(config)
            }
            Err(e) => {
                let err = classify_parse_error(&e);
                if explicit {
                    return Err(err);
                }
                Logger::error(
                    "CONFIG_INVALID",
                    &[("path", &path.display().to_string()), ("error", &e.to_string())],
                );
                Ok(Self::default())
            }
        }
    }

    /// Reject values the downstream components cannot honor.
    fn validate(&self) -> ConfigResult<()> {
        if self.encryption.enabled && self.encryption.method != "passphrase" {
            return Err(ConfigError::invalid(format!(
                "Unsupported encryption method: '{}'. Only 'passphrase' is supported.",
                self.encryption.method
            )));
        }

        if self.remote_backup.enabled && self.remote_backup.kind != "s3" {
            return Err(ConfigError::invalid(format!(
                "Unsupported remote backup type: '{}'. Only 's3' is supported.",
                self.remote_backup.kind
            )));
        }

        if self.remote_backup.enabled && self.remote_backup.bucket.is_empty() {
            return Err(ConfigError::invalid(
                "remote_backup.bucket must be set when remote backup is enabled",
            ));
        }

        Ok(())
    }
}

/// A serde "missing field" failure is a missing base key, everything
/// else is a parse failure.
fn classify_parse_error(e: &serde_json::Error) -> ConfigError {
    let text = e.to_string();
    if let Some(rest) = text.strip_prefix("missing field `") {
        if let Some(key) = rest.split('`').next() {
            return ConfigError::missing_key(key);
        }
    }
    ConfigError::parse(format!("Invalid config JSON: {}", e))
}
