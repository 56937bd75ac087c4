//! Remote replication error types
//!
//! Upload failures never fail a backup run; local durability takes
//! precedence over replication. Callers log these and continue.

use std::fmt;
use std::io;

/// Remote replication error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorCode {
    /// The upload tool failed or the target rejected the artifact
    KamRemoteUpload,
    /// The upload did not finish within the timeout
    KamRemoteTimeout,
}

impl RemoteErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteErrorCode::KamRemoteUpload => "KAM_REMOTE_UPLOAD",
            RemoteErrorCode::KamRemoteTimeout => "KAM_REMOTE_TIMEOUT",
        }
    }
}

impl fmt::Display for RemoteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote replication error
#[derive(Debug)]
pub struct RemoteError {
    code: RemoteErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl RemoteError {
    fn new(code: RemoteErrorCode, message: impl Into<String>, source: Option<io::Error>) -> Self {
        Self {
            code,
            message: message.into(),
            source,
        }
    }

    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorCode::KamRemoteUpload, message, None)
    }

    pub fn upload_failed_with_source(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(RemoteErrorCode::KamRemoteUpload, message, Some(source))
    }

    pub fn timed_out(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorCode::KamRemoteTimeout, message, None)
    }

    pub fn code(&self) -> RemoteErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for remote replication
pub type RemoteResult<T> = Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RemoteErrorCode::KamRemoteUpload.as_str(), "KAM_REMOTE_UPLOAD");
        assert_eq!(RemoteErrorCode::KamRemoteTimeout.as_str(), "KAM_REMOTE_TIMEOUT");
    }

    #[test]
    fn test_display() {
        let err = RemoteError::timed_out("aws s3 cp exceeded 300s");
        let text = format!("{}", err);
        assert!(text.contains("KAM_REMOTE_TIMEOUT"));
        assert!(text.contains("300s"));
    }
}
