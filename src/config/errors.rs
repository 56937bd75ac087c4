//! Configuration-specific error types
//!
//! Configuration errors are only surfaced when the operator explicitly
//! named a config file; an absent or malformed default-path file falls
//! back to built-in defaults with a logged event instead.

use std::fmt;
use std::io;

/// Configuration error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// A required base key is absent from the config file
    KamConfigMissingKey,
    /// The config file is not valid JSON
    KamConfigParse,
    /// The config file could not be read
    KamConfigIo,
    /// A key is present but holds an unsupported value
    KamConfigInvalid,
}

impl ConfigErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigErrorCode::KamConfigMissingKey => "KAM_CONFIG_MISSING_KEY",
            ConfigErrorCode::KamConfigParse => "KAM_CONFIG_PARSE",
            ConfigErrorCode::KamConfigIo => "KAM_CONFIG_IO",
            ConfigErrorCode::KamConfigInvalid => "KAM_CONFIG_INVALID",
        }
    }
}

impl fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration error with context
#[derive(Debug)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl ConfigError {
    fn new(code: ConfigErrorCode, message: impl Into<String>, source: Option<io::Error>) -> Self {
        Self {
            code,
            message: message.into(),
            source,
        }
    }

    pub fn missing_key(key: &str) -> Self {
        Self::new(
            ConfigErrorCode::KamConfigMissingKey,
            format!("Missing required configuration key: {}", key),
            None,
        )
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorCode::KamConfigParse, message, None)
    }

    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(ConfigErrorCode::KamConfigIo, message, Some(source))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorCode::KamConfigInvalid, message, None)
    }

    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
