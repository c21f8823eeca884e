use clap::Args;
use url::Url;

use filedrop_relay::state::{local_relay_url, AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Default identity for send/receive
    #[arg(long)]
    pub identity: Option<String>,

    /// Relay the client talks to (default: http://localhost:<relay-port>)
    #[arg(long)]
    pub relay_url: Option<Url>,

    /// Port the relay service listens on
    #[arg(long, default_value_t = filedrop_relay::state::DEFAULT_RELAY_PORT)]
    pub relay_port: u16,

    /// RSA modulus size for new keypairs (2048 to 4096 bits)
    #[arg(long, default_value_t = common::crypto::DEFAULT_KEY_BITS)]
    pub key_bits: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] filedrop_relay::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            relay_port: self.relay_port,
            relay_url: self
                .relay_url
                .clone()
                .unwrap_or_else(|| local_relay_url(self.relay_port)),
            identity: self.identity.clone(),
            key_bits: self.key_bits,
            ..AppConfig::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized filedrop directory at: {}\n\
             - Keys: {}\n\
             - Received files: {}\n\
             - Config: {}\n\
             - Identity: {}\n\
             - Relay URL: {}\n\
             - Relay port: {}",
            state.filedrop_dir.display(),
            state.keys_path.display(),
            state.received_path.display(),
            state.config_path.display(),
            state.config.identity.as_deref().unwrap_or("(none)"),
            state.config.relay_url,
            state.config.relay_port,
        );

        Ok(output)
    }
}
