//! Session key wrapping with RSA-OAEP
//!
//! The sender encrypts the 32-byte session key to the receiver's RSA public key
//! using OAEP (SHA-256, MGF1-SHA-256, empty label). Only the matching private key
//! can recover it; OAEP's padding check rejects any other key or any corruption.
//!
//! The nonce is not wrapped. It travels in the clear inside the package and is
//! covered by the package signature.

use super::keys::{PublicKey, SecretKey};
use super::session::{SessionKey, SessionKeyError};

/// Errors that can occur while wrapping or recovering a session key
#[derive(Debug, thiserror::Error)]
pub enum WrapError {
    #[error("RSA-OAEP wrap error")]
    Wrap,
    /// Wrong private key, or the wrapped bytes were altered
    #[error("RSA-OAEP unwrap error")]
    Unwrap,
    #[error("session key error: {0}")]
    Session(#[from] SessionKeyError),
}

/// A session key encrypted to one recipient
///
/// The length equals the recipient's modulus size (256 bytes for RSA-2048).
///
/// # Examples
///
/// ```ignore
/// // Alice wraps a fresh session key for Bob
/// let session = SessionKey::generate()?;
/// let wrapped = WrappedKey::new(&session, &bob_public_key)?;
///
/// // Bob recovers it with his private key and the package nonce
/// let recovered = wrapped.recover(&bob_secret_key, session.nonce())?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedKey(Vec<u8>);

impl From<Vec<u8>> for WrappedKey {
    fn from(bytes: Vec<u8>) -> Self {
        WrappedKey(bytes)
    }
}

impl From<WrappedKey> for Vec<u8> {
    fn from(wrapped: WrappedKey) -> Self {
        wrapped.0
    }
}

impl AsRef<[u8]> for WrappedKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl WrappedKey {
    /// Wrap the key half of `session` for `recipient`
    ///
    /// # Errors
    ///
    /// Returns `WrapError::Wrap` if the RSA operation fails (RNG failure or a
    /// modulus too small to hold the padded key).
    pub fn new(session: &SessionKey, recipient: &PublicKey) -> Result<Self, WrapError> {
        let wrapped = recipient
            .wrap(session.key_bytes())
            .map_err(|_| WrapError::Wrap)?;
        Ok(WrappedKey(wrapped))
    }

    /// Recover the session key using the recipient's private key
    ///
    /// # Errors
    ///
    /// Returns `WrapError::Unwrap` if `recipient_secret` is not the key this was
    /// wrapped for, or the bytes were corrupted. Returns `WrapError::Session` if the
    /// unwrapped key or the supplied nonce has the wrong length.
    pub fn recover(
        &self,
        recipient_secret: &SecretKey,
        nonce: &[u8],
    ) -> Result<SessionKey, WrapError> {
        let key_bytes = recipient_secret
            .unwrap(&self.0)
            .map_err(|_| WrapError::Unwrap)?;
        Ok(SessionKey::from_parts(&key_bytes, nonce)?)
    }

    /// Get a reference to the raw wrapped bytes
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}
