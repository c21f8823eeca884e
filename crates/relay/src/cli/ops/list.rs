use clap::Args;

use filedrop_relay::http_server::api::client::ApiError;
use filedrop_relay::http_server::api::list::ListRequest;

#[derive(Args, Debug, Clone)]
pub struct List {
    /// Identity whose inbox to list (default from config)
    #[arg(long)]
    pub identity: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error(transparent)]
    State(#[from] filedrop_relay::state::StateError),
    #[error("list failed: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for List {
    type Error = ListError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let identity = state.identity(self.identity.as_deref())?;

        let response = ctx
            .client
            .call(ListRequest {
                receiver_id: identity.clone(),
            })
            .await?;

        if response.files.is_empty() {
            return Ok(format!("No files for '{}'", identity));
        }

        // Names and sizes are whatever the sender (or the relay) claimed
        let mut lines = vec![format!(
            "{:<36}  {:<20}  {:>10}  NAME (unverified)",
            "FILE ID", "FROM", "SIZE"
        )];
        for file in response.files {
            lines.push(format!(
                "{:<36}  {:<20}  {:>10}  {}",
                file.file_id,
                file.sender_id,
                file.plaintext_size
                    .map(|size| size.to_string())
                    .unwrap_or_else(|| "-".into()),
                file.original_name.as_deref().unwrap_or("-"),
            ));
        }
        Ok(lines.join("\n"))
    }
}
