//! The signed, encrypted package envelope
//!
//! # Building (sender)
//!
//! 1. Draw a fresh `SessionKey` (256-bit key, 96-bit nonce)
//! 2. AES-256-GCM encrypt the plaintext under it
//! 3. Wrap the key for the receiver with RSA-OAEP
//! 4. Sign the canonical digest of
//!    `{sender_id, receiver_id, file_id, nonce, ciphertext, wrapped_key}` with
//!    RSA-PSS under the sender's key
//!
//! # Opening (receiver)
//!
//! ```text
//! Received -> SignatureChecked -> KeyUnwrapped -> Decrypted
//! ```
//!
//! The signature is checked before anything is decrypted. Every failed
//! transition is terminal: no retries, no partial plaintext.

mod digest;
mod directory;
mod package;

pub use digest::{FieldTooLong, SignedFields, DOMAIN_TAG, PROTOCOL_VERSION};
pub use directory::{DirectoryError, KeyDirectory, StaticDirectory};
pub use package::Package;

use crate::crypto::{KeyError, PublicKey, SecretKey, SessionKey, WrapError, WrappedKey};

/// Errors from building or opening a package
///
/// Messages name the failed check only; they never include plaintext, key
/// material or intermediate cryptographic state.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The directory has no key registered for the sender
    #[error("unknown identity '{0}'")]
    UnknownIdentity(String),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// The directory returned key material we could not accept
    #[error("sender key rejected: {0}")]
    Key(#[from] KeyError),
    /// A primitive failed while building; never retried
    #[error("encryption failed: {0}")]
    Encryption(String),
    #[error("signature invalid")]
    SignatureInvalid,
    #[error("failed to unwrap session key")]
    KeyUnwrap,
    #[error("integrity check failed")]
    Integrity,
    #[error("unsupported package version {0}")]
    UnsupportedVersion(u32),
}

/// Encrypt `plaintext` for `receiver_public` and sign it as `sender_id`
///
/// The returned package has every field populated except the unauthenticated
/// `original_name` / `plaintext_size` metadata.
///
/// # Errors
///
/// Returns `EnvelopeError::Encryption` if randomness, AES-GCM, RSA-OAEP or RSA-PSS
/// fails, or a field is too long to encode.
pub fn build_package(
    plaintext: &[u8],
    sender_id: &str,
    receiver_id: &str,
    file_id: &str,
    sender_secret: &SecretKey,
    receiver_public: &PublicKey,
) -> Result<Package, EnvelopeError> {
    let session = SessionKey::generate().map_err(|e| EnvelopeError::Encryption(e.to_string()))?;
    let ciphertext = session
        .encrypt(plaintext)
        .map_err(|e| EnvelopeError::Encryption(e.to_string()))?;
    let wrapped_key = WrappedKey::new(&session, receiver_public)
        .map_err(|e| EnvelopeError::Encryption(e.to_string()))?;
    let nonce = session.nonce().to_vec();
    drop(session);

    let mut package = Package {
        version: PROTOCOL_VERSION,
        file_id: file_id.to_string(),
        sender_id: sender_id.to_string(),
        receiver_id: receiver_id.to_string(),
        nonce,
        ciphertext,
        wrapped_key: wrapped_key.into(),
        signature: Vec::new(),
        original_name: None,
        plaintext_size: None,
    };

    let digest = package
        .signed_fields()
        .digest()
        .map_err(|e| EnvelopeError::Encryption(e.to_string()))?;
    package.signature = sender_secret
        .sign_digest(&digest)
        .map_err(|e| EnvelopeError::Encryption(format!("signing failed: {}", e)))?;

    tracing::debug!(
        file_id,
        sender_id,
        receiver_id,
        plaintext_len = plaintext.len(),
        ciphertext_len = package.ciphertext.len(),
        "built package"
    );
    Ok(package)
}

/// Verify and decrypt a package addressed to the holder of `receiver_secret`
///
/// The sender's key is resolved through `directory` using `package.sender_id`.
///
/// # Errors
///
/// - `UnknownIdentity` / `Directory` / `Key` if the sender key cannot be resolved
/// - `UnsupportedVersion` for packages from a newer protocol
/// - `SignatureInvalid` if any signed field was altered or the signer is not the
///   claimed sender; nothing is decrypted in that case
/// - `KeyUnwrap` if the session key was not wrapped for `receiver_secret`
/// - `Integrity` if AES-GCM authentication fails
pub fn open_package<D>(
    package: &Package,
    receiver_secret: &SecretKey,
    directory: &D,
) -> Result<Vec<u8>, EnvelopeError>
where
    D: KeyDirectory + ?Sized,
{
    if package.version != PROTOCOL_VERSION {
        return Err(EnvelopeError::UnsupportedVersion(package.version));
    }
    let sender_public = directory::resolve(directory, &package.sender_id)?;

    // Received -> SignatureChecked
    let digest = package
        .signed_fields()
        .digest()
        .map_err(|_| EnvelopeError::SignatureInvalid)?;
    if sender_public
        .verify_digest(&digest, &package.signature)
        .is_err()
    {
        tracing::warn!(
            file_id = %package.file_id,
            sender_id = %package.sender_id,
            "package signature rejected"
        );
        return Err(EnvelopeError::SignatureInvalid);
    }

    // SignatureChecked -> KeyUnwrapped
    let session = WrappedKey::from(package.wrapped_key.clone())
        .recover(receiver_secret, &package.nonce)
        .map_err(|e| match e {
            WrapError::Session(_) => EnvelopeError::Integrity,
            _ => EnvelopeError::KeyUnwrap,
        })?;

    // KeyUnwrapped -> Decrypted
    let plaintext = session
        .decrypt(&package.ciphertext)
        .map_err(|_| EnvelopeError::Integrity)?;

    tracing::debug!(
        file_id = %package.file_id,
        sender_id = %package.sender_id,
        plaintext_len = plaintext.len(),
        "opened package"
    );
    Ok(plaintext)
}
