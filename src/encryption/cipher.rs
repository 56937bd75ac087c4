//! Passphrase-based artifact encryption
//!
//! Container layout: `KAMENC1` magic, 16-byte Argon2id salt, 24-byte
//! XChaCha20 nonce, then the AEAD ciphertext (tag included). The key is
//! derived from the passphrase with Argon2id default parameters and the
//! per-file salt, so the same passphrase never reuses a key.

use std::fs;
use std::path::{Path, PathBuf};

use argon2::Argon2;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::{EncryptionError, EncryptionResult};

/// Magic bytes identifying the encrypted container format, version 1.
const MAGIC: &[u8; 7] = b"KAMENC1";

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 24;
const KEY_LEN: usize = 32;

/// Suffix appended to an artifact when it is encrypted.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Narrow sealing capability the backup workflow depends on.
///
/// Production uses [`Cipher`]; workflow tests substitute failing
/// doubles to exercise the degraded, plaintext-kept path.
pub trait ArtifactSealer {
    fn seal(&self, artifact: &Path, passphrase: &str) -> EncryptionResult<PathBuf>;
}

/// Symmetric cipher over whole artifact files.
pub struct Cipher;

impl ArtifactSealer for Cipher {
    fn seal(&self, artifact: &Path, passphrase: &str) -> EncryptionResult<PathBuf> {
        Cipher::encrypt_file(artifact, passphrase)
    }
}

impl Cipher {
    /// Encrypt `path` into a sibling `<path>.enc` and delete the
    /// plaintext. The plaintext is removed only after the encrypted
    /// artifact has been fully written and synced, so a failure at any
    /// point leaves the original artifact in place.
    pub fn encrypt_file(path: &Path, passphrase: &str) -> EncryptionResult<PathBuf> {
        let plaintext =
            fs::read(path).map_err(|e| EncryptionError::io_error_at_path(path, e))?;

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce);

        let key = derive_key(passphrase, &salt)?;
        let cipher = XChaCha20Poly1305::new(Key::from_slice(&key));
        let ciphertext = cipher
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_ref())
            .map_err(|e| EncryptionError::encrypt_failed(format!("AEAD seal failed: {}", e)))?;

        let mut container = Vec::with_capacity(MAGIC.len() + SALT_LEN + NONCE_LEN + ciphertext.len());
        container.extend_from_slice(MAGIC);
        container.extend_from_slice(&salt);
        container.extend_from_slice(&nonce);
        container.extend_from_slice(&ciphertext);

        let encrypted_path = encrypted_sibling(path);
        write_durable(&encrypted_path, &container)?;

        if let Err(e) = fs::remove_file(path) {
            // The caller keeps the plaintext as artifact of record on
            // error; never leave two copies of one run in the store.
            let _ = fs::remove_file(&encrypted_path);
            return Err(EncryptionError::io_error_at_path(path, e));
        }

        Ok(encrypted_path)
    }

    /// Decrypt `<path>.enc` into its sibling plaintext path.
    ///
    /// The plaintext is assembled in memory and written only after the
    /// AEAD open succeeds; a wrong passphrase leaves the filesystem
    /// untouched.
    pub fn decrypt_file(path: &Path, passphrase: &str) -> EncryptionResult<PathBuf> {
        let container =
            fs::read(path).map_err(|e| EncryptionError::io_error_at_path(path, e))?;

        let header_len = MAGIC.len() + SALT_LEN + NONCE_LEN;
        if container.len() < header_len || &container[..MAGIC.len()] != MAGIC {
            return Err(EncryptionError::bad_format(format!(
                "Not a recognized encrypted artifact: {}",
                path.display()
            )));
        }

        let salt = &container[MAGIC.len()..MAGIC.len() + SALT_LEN];
        let nonce = &container[MAGIC.len() + SALT_LEN..header_len];
        let ciphertext = &container[header_len..];

        let key = derive_key(passphrase, salt)?;
        let cipher = XChaCha20Poly1305::new(Key::from_slice(&key));
        let plaintext = cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| {
                EncryptionError::decrypt_failed(format!(
                    "AEAD open failed for {} (wrong passphrase or corrupt artifact)",
                    path.display()
                ))
            })?;

        let plaintext_path = plaintext_sibling(path)?;
        write_durable(&plaintext_path, &plaintext)?;

        Ok(plaintext_path)
    }
}

/// Whether an artifact name marks it as encrypted.
pub fn is_encrypted_name(path: &Path) -> bool {
    path.to_string_lossy().ends_with(ENCRYPTED_SUFFIX)
}

fn encrypted_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(ENCRYPTED_SUFFIX);
    PathBuf::from(name)
}

fn plaintext_sibling(path: &Path) -> EncryptionResult<PathBuf> {
    let text = path.to_string_lossy();
    match text.strip_suffix(ENCRYPTED_SUFFIX) {
        Some(stripped) => Ok(PathBuf::from(stripped)),
        None => Err(EncryptionError::bad_format(format!(
            "Encrypted artifact does not carry the {} suffix: {}",
            ENCRYPTED_SUFFIX,
            path.display()
        ))),
    }
}

fn derive_key(passphrase: &str, salt: &[u8]) -> EncryptionResult<[u8; KEY_LEN]> {
    let mut key = [0u8; KEY_LEN];
    Argon2::default()
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| EncryptionError::encrypt_failed(format!("Key derivation failed: {}", e)))?;
    Ok(key)
}

fn write_durable(path: &Path, bytes: &[u8]) -> EncryptionResult<()> {
    fs::write(path, bytes).map_err(|e| EncryptionError::io_error_at_path(path, e))?;
    let file = fs::File::open(path).map_err(|e| EncryptionError::io_error_at_path(path, e))?;
    file.sync_all()
        .map_err(|e| EncryptionError::io_error_at_path(path, e))?;
    Ok(())
}
