use clap::Args;

use filedrop_relay::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Relay {
    /// Override the listen port (default from config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for log files (default from config; stdout only if unset)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("state error: {0}")]
    StateError(#[from] filedrop_relay::state::StateError),

    #[error("relay failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Relay {
    type Error = RelayError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;

        let mut config = ServiceConfig::new(self.port.unwrap_or(state.config.relay_port));
        config.log_dir = self.log_dir.clone().or(state.config.log_dir);

        spawn_service(&config)
            .await
            .map_err(|e| RelayError::Failed(e.to_string()))?;
        Ok("relay stopped".to_string())
    }
}
