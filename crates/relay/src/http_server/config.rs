use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, log_level: tracing::Level) -> Self {
        tracing::debug!("Creating HTTP server Config: listen_addr={}", listen_addr);
        Self {
            listen_addr,
            log_level,
        }
    }
}
