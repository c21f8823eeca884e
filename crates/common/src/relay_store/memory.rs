use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;

use super::provider::{PackageSummary, RelayStore, RelayStoreError};
use crate::envelope::Package;

/// In-memory relay store using HashMaps
#[derive(Debug, Clone, Default)]
pub struct MemoryRelayStore {
    inner: Arc<RwLock<MemoryRelayStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryRelayStoreInner {
    /// user_id -> public key PEM
    users: HashMap<String, String>,
    /// file_id -> package
    files: HashMap<String, Package>,
    /// file ids in first-upload order
    order: Vec<String>,
}

impl MemoryRelayStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RelayStore for MemoryRelayStore {
    type Error = Infallible;

    async fn register_key(
        &self,
        user_id: String,
        public_key_pem: String,
    ) -> Result<(), RelayStoreError<Self::Error>> {
        if user_id.is_empty() {
            return Err(RelayStoreError::MissingField("user_id"));
        }
        self.inner.write().users.insert(user_id, public_key_pem);
        Ok(())
    }

    async fn public_key(
        &self,
        user_id: &str,
    ) -> Result<Option<String>, RelayStoreError<Self::Error>> {
        Ok(self.inner.read().users.get(user_id).cloned())
    }

    async fn put(&self, mut package: Package) -> Result<String, RelayStoreError<Self::Error>> {
        if package.receiver_id.is_empty() {
            return Err(RelayStoreError::MissingField("receiver_id"));
        }
        if package.sender_id.is_empty() {
            return Err(RelayStoreError::MissingField("sender_id"));
        }
        if package.file_id.is_empty() {
            package.file_id = Uuid::new_v4().to_string();
        }

        let file_id = package.file_id.clone();
        let mut inner = self.inner.write();
        if inner.files.insert(file_id.clone(), package).is_none() {
            inner.order.push(file_id.clone());
        }
        Ok(file_id)
    }

    async fn get(&self, file_id: &str) -> Result<Option<Package>, RelayStoreError<Self::Error>> {
        Ok(self.inner.read().files.get(file_id).cloned())
    }

    async fn list(
        &self,
        receiver_id: &str,
    ) -> Result<Vec<PackageSummary>, RelayStoreError<Self::Error>> {
        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|file_id| inner.files.get(file_id))
            .filter(|package| package.receiver_id == receiver_id)
            .map(PackageSummary::from)
            .collect())
    }
}
