//! On-disk keystore: one PKCS#8 PEM file per identity
//!
//! Layout: `<root>/<identity>.pem`. Only the private key is stored; the public key
//! is always derived from it.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::keys::{KeyError, KeyPair, SecretKey, DEFAULT_KEY_BITS};

/// File extension for persisted private keys
pub const KEY_FILE_EXTENSION: &str = "pem";
/// Upper bound on identity length, in bytes
pub const MAX_IDENTITY_LEN: usize = 128;

/// Check that an identity can safely name a file inside the keystore
///
/// Allowed: ASCII alphanumerics and `-`, `_`, `.`, `@`; no leading `.`.
pub fn validate_identity(identity: &str) -> Result<(), KeyError> {
    let invalid = |reason| Err(KeyError::InvalidIdentity(identity.to_string(), reason));
    if identity.is_empty() {
        return invalid("identity is empty");
    }
    if identity.len() > MAX_IDENTITY_LEN {
        return invalid("identity is too long");
    }
    if identity.starts_with('.') {
        return invalid("identity may not start with '.'");
    }
    if !identity
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
    {
        return invalid("identity contains characters outside [A-Za-z0-9-_.@]");
    }
    Ok(())
}

/// Creates, persists and loads identity keypairs
///
/// `load_or_create` is a critical section: concurrent callers in this process are
/// serialized by a mutex, and new keys are linked into place without clobbering so
/// that racing processes converge on whichever key landed first.
///
/// # Examples
///
/// ```ignore
/// let keystore = Keystore::new(state.keys_path.clone());
/// let alice = keystore.load_or_create("alice")?;
/// let again = keystore.load_or_create("alice")?;
/// assert_eq!(alice.public(), again.public());
/// ```
#[derive(Debug)]
pub struct Keystore {
    root: PathBuf,
    key_bits: usize,
    lock: Mutex<()>,
}

impl Keystore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            key_bits: DEFAULT_KEY_BITS,
            lock: Mutex::new(()),
        }
    }

    /// Modulus size for keys generated from now on; existing keys are untouched
    pub fn with_key_bits(mut self, key_bits: usize) -> Self {
        self.key_bits = key_bits;
        self
    }

    /// Path of the key file backing `identity`
    pub fn key_path(&self, identity: &str) -> Result<PathBuf, KeyError> {
        validate_identity(identity)?;
        Ok(self
            .root
            .join(format!("{}.{}", identity, KEY_FILE_EXTENSION)))
    }

    pub fn exists(&self, identity: &str) -> Result<bool, KeyError> {
        Ok(self.key_path(identity)?.exists())
    }

    /// Load a persisted keypair without ever generating one
    ///
    /// # Errors
    ///
    /// - `KeyError::NotFound` if nothing is persisted for `identity`
    /// - `KeyError::Keystore` if the file exists but cannot be parsed
    pub fn load(&self, identity: &str) -> Result<KeyPair, KeyError> {
        let path = self.key_path(identity)?;
        match read_key(&path)? {
            Some(secret) => Ok(KeyPair::new(identity, secret)),
            None => Err(KeyError::NotFound(identity.to_string())),
        }
    }

    /// Load the keypair for `identity`, generating and persisting one on first use
    ///
    /// # Errors
    ///
    /// - `KeyError::Keystore` if a key file exists but is corrupt; it is never
    ///   silently replaced
    /// - `KeyError::Generation` if a new key cannot be generated
    /// - `KeyError::Io` if the keystore directory cannot be written
    pub fn load_or_create(&self, identity: &str) -> Result<KeyPair, KeyError> {
        let path = self.key_path(identity)?;
        let _guard = self.lock.lock();

        if let Some(secret) = read_key(&path)? {
            tracing::debug!(identity, path = %path.display(), "loaded existing keypair");
            return Ok(KeyPair::new(identity, secret));
        }

        tracing::info!(identity, bits = self.key_bits, "generating new keypair");
        let secret = SecretKey::generate(self.key_bits)?;

        if self.persist(&path, &secret)? {
            tracing::info!(identity, path = %path.display(), "persisted new keypair");
            return Ok(KeyPair::new(identity, secret));
        }

        // Another process persisted first; its key wins
        tracing::warn!(identity, "keypair created concurrently elsewhere, loading it");
        match read_key(&path)? {
            Some(secret) => Ok(KeyPair::new(identity, secret)),
            None => Err(KeyError::Keystore(format!(
                "key file {} vanished while loading",
                path.display()
            ))),
        }
    }

    /// Write `secret` to `path` unless something is already there.
    /// Returns false if the path was taken.
    fn persist(&self, path: &Path, secret: &SecretKey) -> Result<bool, KeyError> {
        fs::create_dir_all(&self.root)?;
        let pem = secret.to_pem()?;

        // NamedTempFile is created with 0600 on unix
        let mut tmp = tempfile::Builder::new()
            .prefix(".tmp-")
            .suffix(".pem")
            .tempfile_in(&self.root)?;
        tmp.write_all(pem.as_bytes())?;
        tmp.as_file().sync_all()?;

        match tmp.persist_noclobber(path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.error.into()),
        }
    }
}

fn read_key(path: &Path) -> Result<Option<SecretKey>, KeyError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let pem = std::str::from_utf8(&bytes).map_err(|_| {
        KeyError::Keystore(format!("key file {} is not valid UTF-8", path.display()))
    })?;
    let secret = SecretKey::from_pem(pem).map_err(|e| {
        KeyError::Keystore(format!("key file {} is corrupt: {}", path.display(), e))
    })?;
    Ok(Some(secret))
}
