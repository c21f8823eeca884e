//! Single-use content encryption using AES-256-GCM
//!
//! Every package gets its own `SessionKey`: a random 256-bit key and a random 96-bit
//! nonce drawn together. The pair is used for exactly one encryption and is zeroized
//! when dropped, so a nonce can never repeat under the same key.

use std::fmt;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use zeroize::Zeroize;

/// Size of AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;
/// Size of AES-256-GCM key in bytes (256 bits)
pub const SESSION_KEY_SIZE: usize = 32;
/// Size of the GCM authentication tag appended to every ciphertext
pub const TAG_SIZE: usize = 16;

/// Errors that can occur during session encryption/decryption
#[derive(Debug, thiserror::Error)]
pub enum SessionKeyError {
    #[error("failed to gather randomness: {0}")]
    Random(String),
    #[error("invalid session key size, expected {expected}, got {got}")]
    KeySize { expected: usize, got: usize },
    #[error("invalid nonce size, expected {expected}, got {got}")]
    NonceSize { expected: usize, got: usize },
    #[error("encrypt error")]
    Encrypt,
    /// Tag mismatch: wrong key, wrong nonce, or tampered ciphertext
    #[error("decrypt error")]
    Decrypt,
}

/// A fresh AES-256-GCM key and nonce scoped to one package
///
/// Deliberately neither `Clone` nor serializable. The key bytes only ever leave
/// this type on their way into an RSA-OAEP wrap.
///
/// # Examples
///
/// ```ignore
/// let session = SessionKey::generate()?;
/// let ciphertext = session.encrypt(b"sensitive data")?;
/// assert_eq!(ciphertext.len(), 14 + TAG_SIZE);
///
/// let recovered = session.decrypt(&ciphertext)?;
/// assert_eq!(recovered, b"sensitive data");
/// ```
pub struct SessionKey {
    key: [u8; SESSION_KEY_SIZE],
    nonce: [u8; NONCE_SIZE],
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKey")
            .field("nonce", &hex::encode(self.nonce))
            .finish_non_exhaustive()
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl SessionKey {
    /// Draw a new key and nonce from the operating system's CSPRNG
    ///
    /// # Errors
    ///
    /// Returns `SessionKeyError::Random` if the OS RNG is unavailable. Callers must
    /// treat that as fatal rather than retry with some other source.
    pub fn generate() -> Result<Self, SessionKeyError> {
        let mut key = [0u8; SESSION_KEY_SIZE];
        let mut nonce = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut key).map_err(|e| SessionKeyError::Random(e.to_string()))?;
        getrandom::getrandom(&mut nonce).map_err(|e| SessionKeyError::Random(e.to_string()))?;
        Ok(Self { key, nonce })
    }

    /// Rebuild a session key on the receiving side from unwrapped key bytes and
    /// the nonce carried in the package
    ///
    /// # Errors
    ///
    /// Returns an error if either slice has the wrong length.
    pub fn from_parts(key: &[u8], nonce: &[u8]) -> Result<Self, SessionKeyError> {
        if key.len() != SESSION_KEY_SIZE {
            return Err(SessionKeyError::KeySize {
                expected: SESSION_KEY_SIZE,
                got: key.len(),
            });
        }
        if nonce.len() != NONCE_SIZE {
            return Err(SessionKeyError::NonceSize {
                expected: NONCE_SIZE,
                got: nonce.len(),
            });
        }
        let mut session = Self {
            key: [0; SESSION_KEY_SIZE],
            nonce: [0; NONCE_SIZE],
        };
        session.key.copy_from_slice(key);
        session.nonce.copy_from_slice(nonce);
        Ok(session)
    }

    pub(crate) fn key_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Encrypt with AES-256-GCM; output is `ciphertext || tag (16 bytes)`
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, SessionKeyError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        cipher
            .encrypt(Nonce::from_slice(&self.nonce), plaintext)
            .map_err(|_| SessionKeyError::Encrypt)
    }

    /// Decrypt and authenticate `ciphertext || tag`
    ///
    /// # Errors
    ///
    /// Returns `SessionKeyError::Decrypt` if the tag does not verify.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, SessionKeyError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        cipher
            .decrypt(Nonce::from_slice(&self.nonce), ciphertext)
            .map_err(|_| SessionKeyError::Decrypt)
    }
}
