mod memory;
mod provider;

pub use memory::MemoryRelayStore;
pub use provider::{PackageSummary, RelayStore, RelayStoreError};
