use std::path::PathBuf;

use clap::Args;

use filedrop_relay::transfer::{self, TransferError};

use super::{load_identity, IdentityError};

#[derive(Args, Debug, Clone)]
pub struct Receive {
    /// Package to fetch (default: the oldest one waiting)
    #[arg(long)]
    pub file_id: Option<String>,

    /// Where to write the file; a per-identity subdirectory is created
    ///  (default: the `received/` directory under the config path)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Identity to receive as (default from config)
    #[arg(long)]
    pub identity: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReceiveError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    State(#[from] filedrop_relay::state::StateError),
    #[error("receive failed: {0}")]
    Transfer(#[from] TransferError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Receive {
    type Error = ReceiveError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let keypair = load_identity(&state, self.identity.as_deref())?;
        let out_dir = self
            .out_dir
            .clone()
            .unwrap_or_else(|| state.received_path.clone());

        let outcome =
            transfer::receive_file(&ctx.client, &keypair, self.file_id.as_deref(), &out_dir)
                .await?;

        Ok(format!(
            "File decrypted\n\
             File ID: {}\n\
             From: {}\n\
             Original name: {}\n\
             Saved to: {}\n\
             Size: {} bytes\n\
             Signature: VERIFIED",
            outcome.file_id,
            outcome.sender_id,
            outcome.original_name.as_deref().unwrap_or("-"),
            outcome.saved_to.display(),
            outcome.plaintext_size,
        ))
    }
}
