use std::path::PathBuf;

use clap::Args;

use filedrop_relay::transfer::{self, TransferError};

use super::{load_identity, IdentityError};

#[derive(Args, Debug, Clone)]
pub struct SendFile {
    /// Identity of the receiver
    #[arg(long)]
    pub to: String,

    /// File to send
    pub path: PathBuf,

    /// Identity to send as (default from config)
    #[arg(long)]
    pub identity: Option<String>,

    /// File id to sign into the package (default: a fresh UUID)
    #[arg(long)]
    pub file_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    State(#[from] filedrop_relay::state::StateError),
    #[error("send failed: {0}")]
    Transfer(#[from] TransferError),
    #[error("--file-id may not be empty")]
    EmptyFileId,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for SendFile {
    type Error = SendError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // An empty id would be replaced by the relay after signing
        if self.file_id.as_deref() == Some("") {
            return Err(SendError::EmptyFileId);
        }

        let state = ctx.state()?;
        let keypair = load_identity(&state, self.identity.as_deref())?;

        let outcome = transfer::send_file(
            &ctx.client,
            &keypair,
            &self.to,
            &self.path,
            self.file_id.clone(),
        )
        .await?;

        Ok(format!(
            "File uploaded\n\
             File ID: {}\n\
             From: {}\n\
             To: {}\n\
             Filename: {}\n\
             Size: {} bytes\n\
             Encrypted size: {} bytes",
            outcome.file_id,
            outcome.sender_id,
            outcome.receiver_id,
            outcome.original_name.as_deref().unwrap_or("-"),
            outcome.plaintext_size,
            outcome.ciphertext_size,
        ))
    }
}
