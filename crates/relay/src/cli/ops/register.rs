use clap::Args;

use filedrop_relay::transfer::{self, TransferError};

use super::{load_identity, IdentityError};

#[derive(Args, Debug, Clone)]
pub struct Register {
    /// Identity to publish (default from config)
    #[arg(long)]
    pub identity: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    State(#[from] filedrop_relay::state::StateError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("key encoding failed: {0}")]
    Key(#[from] common::crypto::KeyError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Register {
    type Error = RegisterError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let keypair = load_identity(&state, self.identity.as_deref())?;
        transfer::register(&ctx.client, &keypair).await?;

        Ok(format!(
            "Registered '{}' with {}\nFingerprint: {}",
            keypair.identity(),
            ctx.client.base_url(),
            keypair.public().fingerprint()?,
        ))
    }
}
