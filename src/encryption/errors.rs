//! Encryption-specific error types
//!
//! The same failures carry different weight depending on direction:
//! a failed encrypt degrades the backup run (plaintext artifact kept),
//! a failed decrypt aborts a restore. Severity is the caller's call;
//! these types only say what went wrong.

use std::fmt;
use std::io;

/// Encryption error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionErrorCode {
    /// Sealing a plaintext artifact failed
    KamCryptEncrypt,
    /// Opening an encrypted artifact failed (bad passphrase, corrupt data)
    KamCryptDecrypt,
    /// The file is not in the expected encrypted container format
    KamCryptFormat,
    /// I/O failure while reading or writing artifact bytes
    KamCryptIo,
}

impl EncryptionErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncryptionErrorCode::KamCryptEncrypt => "KAM_CRYPT_ENCRYPT",
            EncryptionErrorCode::KamCryptDecrypt => "KAM_CRYPT_DECRYPT",
            EncryptionErrorCode::KamCryptFormat => "KAM_CRYPT_FORMAT",
            EncryptionErrorCode::KamCryptIo => "KAM_CRYPT_IO",
        }
    }
}

impl fmt::Display for EncryptionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encryption error with context
#[derive(Debug)]
pub struct EncryptionError {
    code: EncryptionErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl EncryptionError {
    fn new(
        code: EncryptionErrorCode,
        message: impl Into<String>,
        source: Option<io::Error>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source,
        }
    }

    pub fn encrypt_failed(message: impl Into<String>) -> Self {
        Self::new(EncryptionErrorCode::KamCryptEncrypt, message, None)
    }

    pub fn decrypt_failed(message: impl Into<String>) -> Self {
        Self::new(EncryptionErrorCode::KamCryptDecrypt, message, None)
    }

    pub fn bad_format(message: impl Into<String>) -> Self {
        Self::new(EncryptionErrorCode::KamCryptFormat, message, None)
    }

    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(EncryptionErrorCode::KamCryptIo, message, Some(source))
    }

    pub fn io_error_at_path(path: &std::path::Path, source: io::Error) -> Self {
        Self::io_error(format!("I/O error at {}", path.display()), source)
    }

    pub fn code(&self) -> EncryptionErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EncryptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for EncryptionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for encryption operations
pub type EncryptionResult<T> = Result<T, EncryptionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EncryptionErrorCode::KamCryptEncrypt.as_str(), "KAM_CRYPT_ENCRYPT");
        assert_eq!(EncryptionErrorCode::KamCryptDecrypt.as_str(), "KAM_CRYPT_DECRYPT");
        assert_eq!(EncryptionErrorCode::KamCryptFormat.as_str(), "KAM_CRYPT_FORMAT");
    }

    #[test]
    fn test_display() {
        let err = EncryptionError::decrypt_failed("AEAD open failed");
        let text = format!("{}", err);
        assert!(text.contains("KAM_CRYPT_DECRYPT"));
        assert!(text.contains("AEAD open failed"));
    }
}
