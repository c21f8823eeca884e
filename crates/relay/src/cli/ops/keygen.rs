use clap::Args;

use super::{load_identity, IdentityError};

#[derive(Args, Debug, Clone)]
pub struct Keygen {
    /// Identity to load or create a keypair for (default from config)
    #[arg(long)]
    pub identity: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("key encoding failed: {0}")]
    Key(#[from] common::crypto::KeyError),
    #[error(transparent)]
    State(#[from] filedrop_relay::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Keygen {
    type Error = KeygenError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let keypair = load_identity(&state, self.identity.as_deref())?;
        let path = state.keystore().key_path(keypair.identity())?;

        Ok(format!(
            "Identity: {}\nKey file: {}\nKey size: {} bits\nFingerprint: {}\n\n{}",
            keypair.identity(),
            path.display(),
            keypair.public().bits(),
            keypair.public().fingerprint()?,
            keypair.encode_public_key()?.trim_end(),
        ))
    }
}
