//! CLI-specific error types
//!
//! Every CLI error is terminal and maps to a process exit code:
//! 2 for configuration errors on an explicitly named config file,
//! 1 for any fatal stage failure (archive build, restore).

use std::fmt;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Backup run failed
    BackupFailed,
    /// Restore failed
    RestoreFailed,
    /// Rotation scan failed
    RotateFailed,
}

impl CliErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigError => "KAM_CLI_CONFIG_ERROR",
            Self::BackupFailed => "KAM_CLI_BACKUP_FAILED",
            Self::RestoreFailed => "KAM_CLI_RESTORE_FAILED",
            Self::RotateFailed => "KAM_CLI_ROTATE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn backup_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BackupFailed, msg)
    }

    pub fn restore_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RestoreFailed, msg)
    }

    pub fn rotate_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RotateFailed, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            CliErrorCode::ConfigError => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::config_error("x").exit_code(), 2);
        assert_eq!(CliError::backup_failed("x").exit_code(), 1);
        assert_eq!(CliError::restore_failed("x").exit_code(), 1);
        assert_eq!(CliError::rotate_failed("x").exit_code(), 1);
    }

    #[test]
    fn test_display_contains_code() {
        let err = CliError::restore_failed("artifact not found");
        let text = format!("{}", err);
        assert!(text.contains("KAM_CLI_RESTORE_FAILED"));
        assert!(text.contains("artifact not found"));
    }
}
