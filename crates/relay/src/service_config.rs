use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Address the relay HTTP server binds to
    pub listen_addr: SocketAddr,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Listen on all interfaces at `port`
    pub fn new(port: u16) -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
