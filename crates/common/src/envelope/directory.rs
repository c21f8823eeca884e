//! The sender-key lookup capability handed to `open_package`
//!
//! The codec never talks to the network. Whoever opens a package supplies a
//! `KeyDirectory` that maps a sender identity to the PEM it registered; in the CLI
//! that is a `StaticDirectory` pre-filled from the relay, in tests a closure.

use std::collections::HashMap;

use crate::crypto::PublicKey;

use super::EnvelopeError;

/// The directory could not answer at all (as opposed to "no such identity")
#[derive(Debug, thiserror::Error)]
#[error("key directory unavailable: {0}")]
pub struct DirectoryError(pub String);

/// Resolves identities to their published public key PEM
pub trait KeyDirectory {
    /// `Ok(None)` means the identity is not registered
    fn public_key_pem(&self, identity: &str) -> Result<Option<String>, DirectoryError>;
}

impl<F> KeyDirectory for F
where
    F: Fn(&str) -> Option<String>,
{
    fn public_key_pem(&self, identity: &str) -> Result<Option<String>, DirectoryError> {
        Ok(self(identity))
    }
}

/// In-memory identity → PEM map
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    keys: HashMap<String, String>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identity: impl Into<String>, public_key_pem: impl Into<String>) {
        self.keys.insert(identity.into(), public_key_pem.into());
    }

    pub fn with(mut self, identity: impl Into<String>, public_key_pem: impl Into<String>) -> Self {
        self.insert(identity, public_key_pem);
        self
    }
}

impl KeyDirectory for StaticDirectory {
    fn public_key_pem(&self, identity: &str) -> Result<Option<String>, DirectoryError> {
        Ok(self.keys.get(identity).cloned())
    }
}

/// Look up and decode `identity`'s key, never substituting a default
pub(crate) fn resolve<D>(directory: &D, identity: &str) -> Result<PublicKey, EnvelopeError>
where
    D: KeyDirectory + ?Sized,
{
    let pem = directory
        .public_key_pem(identity)?
        .ok_or_else(|| EnvelopeError::UnknownIdentity(identity.to_string()))?;
    Ok(PublicKey::from_pem(&pem)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::{KeyError, SecretKey, DEFAULT_KEY_BITS};

    #[test]
    fn test_resolve_static_directory() {
        let key = SecretKey::generate(DEFAULT_KEY_BITS).unwrap().public();
        let directory = StaticDirectory::new().with("alice", key.to_pem().unwrap());

        assert_eq!(resolve(&directory, "alice").unwrap(), key);
        assert!(matches!(
            resolve(&directory, "mallory"),
            Err(EnvelopeError::UnknownIdentity(id)) if id == "mallory"
        ));
    }

    #[test]
    fn test_resolve_closure_and_bad_pem() {
        let directory = |identity: &str| (identity == "alice").then(|| "garbage".to_string());
        assert!(matches!(
            resolve(&directory, "alice"),
            Err(EnvelopeError::Key(KeyError::Format(_)))
        ));
        assert!(matches!(
            resolve(&directory, "bob"),
            Err(EnvelopeError::UnknownIdentity(_))
        ));
    }

    #[test]
    fn test_directory_failure_propagates() {
        struct Down;
        impl KeyDirectory for Down {
            fn public_key_pem(&self, _: &str) -> Result<Option<String>, DirectoryError> {
                Err(DirectoryError("connection refused".into()))
            }
        }
        assert!(matches!(
            resolve(&Down, "alice"),
            Err(EnvelopeError::Directory(_))
        ));
    }
}
