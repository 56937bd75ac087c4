//! Encryption gate for backup artifacts
//!
//! Optionally seals a finished artifact with a passphrase-derived
//! symmetric key. The passphrase comes from a configured environment
//! variable; when that variable is unset a fixed built-in passphrase is
//! used for compatibility with existing deployments. That fallback is
//! deliberately weak and is logged loudly every time it is taken.

mod cipher;
mod errors;

pub use cipher::{is_encrypted_name, ArtifactSealer, Cipher, ENCRYPTED_SUFFIX};
pub use errors::{EncryptionError, EncryptionErrorCode, EncryptionResult};

use crate::observability::Logger;

/// Built-in passphrase used when the configured environment variable is
/// unset. Kept for compatibility with stores written by earlier
/// tooling; operators are warned on every use.
pub const INSECURE_DEFAULT_PASSPHRASE: &str = "default_key";

/// Resolve the artifact passphrase from the named environment variable.
pub fn passphrase_from_env(var: &str) -> String {
    match std::env::var(var) {
        Ok(passphrase) if !passphrase.is_empty() => passphrase,
        _ => {
            Logger::warn(
                "ENCRYPTION_DEFAULT_PASSPHRASE",
                &[("env_var", var)],
            );
            INSECURE_DEFAULT_PASSPHRASE.to_string()
        }
    }
}
