// Relay service modules
pub mod http_server;
pub mod process;
pub mod service_config;
pub mod service_state;

// Client-side flows shared by the CLI
pub mod transfer;

// App state (configuration, paths)
pub mod state;

pub use process::{init_cli_logging, spawn_service, start_service, ShutdownHandle};
pub use service_config::Config as ServiceConfig;
pub use service_state::State as ServiceState;
pub use state::{AppConfig, AppState, StateError};
