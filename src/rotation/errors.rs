//! Rotation error types
//!
//! Only a failure to scan the store at all surfaces as an error;
//! per-entry failures are absorbed and logged by the reaper.

use std::fmt;
use std::io;

/// Rotation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationErrorCode {
    /// The backup store directory could not be scanned
    KamRotateScan,
}

impl RotationErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationErrorCode::KamRotateScan => "KAM_ROTATE_SCAN",
        }
    }
}

impl fmt::Display for RotationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation error
#[derive(Debug)]
pub struct RotationError {
    code: RotationErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl RotationError {
    pub fn scan_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: RotationErrorCode::KamRotateScan,
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn code(&self) -> RotationErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for RotationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for rotation
pub type RotationResult<T> = Result<T, RotationError>;
