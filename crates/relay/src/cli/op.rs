use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use filedrop_relay::http_server::api::client::{ApiClient, ApiError};
use filedrop_relay::state::{local_relay_url, AppState, StateError, DEFAULT_RELAY_PORT};

/// Resolve the relay URL for the API client.
///
/// Priority: explicit `--remote` flag > config file `relay_url` > localhost on the default port.
pub fn resolve_remote(explicit: Option<Url>, state: Option<&AppState>) -> Url {
    if let Some(url) = explicit {
        return url;
    }
    match state {
        Some(state) => state.config.relay_url.clone(),
        None => local_relay_url(DEFAULT_RELAY_PORT),
    }
}

#[derive(Clone)]
pub struct OpContext {
    /// API client pointed at the resolved relay
    pub client: ApiClient,
    /// Optional custom config path (defaults to ~/.filedrop)
    pub config_path: Option<PathBuf>,
}

impl OpContext {
    /// Create context with an optional remote override and config path
    pub fn new(remote: Option<Url>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let state = AppState::load_or_default(config_path.clone()).ok();
        let remote = resolve_remote(remote, state.as_ref());
        let timeout = state
            .as_ref()
            .map(|s| s.config.request_timeout_secs)
            .unwrap_or(filedrop_relay::state::DEFAULT_REQUEST_TIMEOUT_SECS);

        Ok(Self {
            client: ApiClient::new(&remote, Duration::from_secs(timeout))?,
            config_path,
        })
    }

    /// Config and paths, falling back to defaults when `init` was never run
    pub fn state(&self) -> Result<AppState, StateError> {
        AppState::load_or_default(self.config_path.clone())
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
