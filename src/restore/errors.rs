//! Restore-specific error types
//!
//! Restore failures carry the stage that failed. Decrypt and unpack
//! failures abort the restore; a failed service restart does not, it
//! downgrades the outcome to completed-with-warnings instead.

use std::fmt;
use std::io;

/// The stage a restore failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStage {
    Decrypting,
    Unpacking,
    RestartingService,
}

impl RestoreStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreStage::Decrypting => "decrypting",
            RestoreStage::Unpacking => "unpacking",
            RestoreStage::RestartingService => "restarting_service",
        }
    }
}

/// Restore error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreErrorCode {
    /// The artifact could not be decrypted
    KamRestoreDecrypt,
    /// The artifact could not be unpacked onto the filesystem
    KamRestoreUnpack,
    /// The dependent service could not be restarted
    KamRestoreService,
}

impl RestoreErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreErrorCode::KamRestoreDecrypt => "KAM_RESTORE_DECRYPT",
            RestoreErrorCode::KamRestoreUnpack => "KAM_RESTORE_UNPACK",
            RestoreErrorCode::KamRestoreService => "KAM_RESTORE_SERVICE",
        }
    }
}

impl fmt::Display for RestoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restore error with the failed stage attached
#[derive(Debug)]
pub struct RestoreError {
    code: RestoreErrorCode,
    stage: RestoreStage,
    message: String,
    source: Option<io::Error>,
}

impl RestoreError {
    pub fn decrypt_failed(message: impl Into<String>) -> Self {
        Self {
            code: RestoreErrorCode::KamRestoreDecrypt,
            stage: RestoreStage::Decrypting,
            message: message.into(),
            source: None,
        }
    }

    pub fn unpack_failed(message: impl Into<String>) -> Self {
        Self {
            code: RestoreErrorCode::KamRestoreUnpack,
            stage: RestoreStage::Unpacking,
            message: message.into(),
            source: None,
        }
    }

    pub fn unpack_failed_with_source(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: RestoreErrorCode::KamRestoreUnpack,
            stage: RestoreStage::Unpacking,
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn code(&self) -> RestoreErrorCode {
        self.code
    }

    pub fn stage(&self) -> RestoreStage {
        self.stage
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] restore stage '{}' failed: {}",
            self.code,
            self.stage.as_str(),
            self.message
        )?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for RestoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for restore operations
pub type RestoreResult<T> = Result<T, RestoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RestoreErrorCode::KamRestoreDecrypt.as_str(), "KAM_RESTORE_DECRYPT");
        assert_eq!(RestoreErrorCode::KamRestoreUnpack.as_str(), "KAM_RESTORE_UNPACK");
        assert_eq!(RestoreErrorCode::KamRestoreService.as_str(), "KAM_RESTORE_SERVICE");
    }

    #[test]
    fn test_error_carries_stage() {
        let err = RestoreError::decrypt_failed("wrong passphrase");
        assert_eq!(err.stage(), RestoreStage::Decrypting);
        assert!(format!("{}", err).contains("decrypting"));

        let err = RestoreError::unpack_failed("truncated archive");
        assert_eq!(err.stage(), RestoreStage::Unpacking);
    }
}
