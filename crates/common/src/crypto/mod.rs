//! Cryptographic primitives for FileDrop
//!
//! - **Identity**: one RSA keypair per identity (`SecretKey`/`PublicKey`), at least
//!   2048 bits, used both to sign packages and to receive wrapped keys
//! - **Key management**: the `Keystore` loads or creates keypairs and persists them
//!   as PKCS#8 PEM; public keys are exchanged as SubjectPublicKeyInfo PEM
//! - **Content encryption**: a fresh AES-256-GCM `SessionKey` (key + nonce) per package
//! - **Key wrapping**: the session key is encrypted to the receiver with RSA-OAEP
//!   (SHA-256) as a `WrappedKey`
//!
//! Signatures (RSA-PSS over SHA-256) are produced and checked by `crate::envelope`,
//! which owns the canonical encoding of what gets signed.

mod keys;
mod keystore;
mod session;
mod wrapped_key;

pub use keys::{
    KeyError, KeyPair, PublicKey, SecretKey, DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS,
};
pub use keystore::{validate_identity, Keystore, KEY_FILE_EXTENSION, MAX_IDENTITY_LEN};
pub use session::{SessionKey, SessionKeyError, NONCE_SIZE, SESSION_KEY_SIZE, TAG_SIZE};
pub use wrapped_key::{WrapError, WrappedKey};
