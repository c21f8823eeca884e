use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::relay_store::MemoryRelayStore;

/// Shared state handed to every relay handler
///
/// Packages and registered keys live in memory only; restarting the relay
///  forgets everything.
#[derive(Debug, Clone, Default)]
pub struct State {
    store: MemoryRelayStore,
    shutting_down: Arc<AtomicBool>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &MemoryRelayStore {
        &self.store
    }

    /// Flip readiness off so load balancers stop routing to us
    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }
}
