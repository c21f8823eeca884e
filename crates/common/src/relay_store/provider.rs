use std::fmt::{Debug, Display};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::envelope::Package;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayStoreError<T> {
    #[error("unhandled relay store provider error: {0}")]
    Provider(#[from] T),
    /// A package or registration is missing a routing field
    ///  the store needs to index it
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// What the relay reveals about a package when listing a receiver's inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub file_id: String,
    pub sender_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext_size: Option<u64>,
}

impl From<&Package> for PackageSummary {
    fn from(package: &Package) -> Self {
        Self {
            file_id: package.file_id.clone(),
            sender_id: package.sender_id.clone(),
            original_name: package.original_name.clone(),
            plaintext_size: package.plaintext_size,
        }
    }
}

/// The relay's keyed storage: a public key directory plus a package store
///
/// The relay is honest-but-curious: implementations store packages as opaque
///  records and never look inside them beyond the routing fields.
#[async_trait]
pub trait RelayStore: Send + Sync + std::fmt::Debug + Clone + 'static {
    type Error: Display + Debug;

    /// Publish (or replace) the public key PEM for a user
    async fn register_key(
        &self,
        user_id: String,
        public_key_pem: String,
    ) -> Result<(), RelayStoreError<Self::Error>>;

    /// Look up the public key PEM a user registered
    ///
    /// # Returns
    /// * `Ok(Some(pem))` - The registered key
    /// * `Ok(None)` - The user never registered
    async fn public_key(&self, user_id: &str)
        -> Result<Option<String>, RelayStoreError<Self::Error>>;

    /// Store a package, keyed by its file id
    ///
    /// If `package.file_id` is empty a fresh UUID v4 is assigned. A package with
    ///  an existing file id replaces the stored one but keeps its list position.
    ///
    /// # Returns
    /// * `Ok(file_id)` - The id the package is stored under
    async fn put(&self, package: Package) -> Result<String, RelayStoreError<Self::Error>>;

    /// Fetch a package by file id
    async fn get(&self, file_id: &str) -> Result<Option<Package>, RelayStoreError<Self::Error>>;

    /// List packages addressed to `receiver_id`, oldest upload first
    async fn list(
        &self,
        receiver_id: &str,
    ) -> Result<Vec<PackageSummary>, RelayStoreError<Self::Error>>;
}
