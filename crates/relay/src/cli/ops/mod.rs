pub mod health;
pub mod init;
pub mod keygen;
pub mod list;
pub mod receive;
pub mod register;
pub mod relay;
pub mod send;
pub mod version;

pub use health::Health;
pub use init::Init;
pub use keygen::Keygen;
pub use list::List;
pub use receive::Receive;
pub use register::Register;
pub use relay::Relay;
pub use send::SendFile;
pub use version::Version;

use common::crypto::{KeyError, KeyPair};
use filedrop_relay::state::{AppState, StateError};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Resolve the acting identity and load (or create) its keypair
pub fn load_identity(state: &AppState, explicit: Option<&str>) -> Result<KeyPair, IdentityError> {
    let identity = state.identity(explicit)?;
    Ok(state.keystore().load_or_create(&identity)?)
}
