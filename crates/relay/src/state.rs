use std::{fs, path::PathBuf};

use common::crypto::{validate_identity, Keystore, DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS};
use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "filedrop";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEYS_DIR_NAME: &str = "keys";
pub const RECEIVED_DIR_NAME: &str = "received";

pub const DEFAULT_RELAY_PORT: u16 = 8000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port the relay service listens on
    #[serde(default = "default_relay_port")]
    pub relay_port: u16,
    /// Relay the client talks to
    #[serde(default = "default_relay_url")]
    pub relay_url: Url,
    /// Identity used when a command is not given `--identity`
    #[serde(default)]
    pub identity: Option<String>,
    /// Modulus size for newly generated keypairs
    #[serde(default = "default_key_bits")]
    pub key_bits: usize,
    /// Per-request timeout for relay calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Directory for relay log files (stdout only if not set)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_relay_port() -> u16 {
    DEFAULT_RELAY_PORT
}

fn default_relay_url() -> Url {
    local_relay_url(DEFAULT_RELAY_PORT)
}

fn default_key_bits() -> usize {
    DEFAULT_KEY_BITS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// `http://localhost:<port>`
pub fn local_relay_url(port: u16) -> Url {
    Url::parse(&format!("http://localhost:{}", port)).expect("localhost URL must parse")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            relay_port: default_relay_port(),
            relay_url: default_relay_url(),
            identity: None,
            key_bits: default_key_bits(),
            request_timeout_secs: default_request_timeout_secs(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    fn validate(&self) -> Result<(), StateError> {
        if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&self.key_bits) {
            return Err(StateError::InvalidConfig(format!(
                "key_bits must be between {} and {}, got {}",
                MIN_KEY_BITS, MAX_KEY_BITS, self.key_bits
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(StateError::InvalidConfig(
                "request_timeout_secs must be positive".into(),
            ));
        }
        if let Some(identity) = &self.identity {
            validate_identity(identity)
                .map_err(|e| StateError::InvalidConfig(e.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the filedrop directory (~/.filedrop)
    pub filedrop_dir: PathBuf,
    /// Path to the keystore directory
    pub keys_path: PathBuf,
    /// Default output directory for received files
    pub received_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the filedrop directory path (custom or default ~/.filedrop)
    pub fn filedrop_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new filedrop state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let filedrop_dir = Self::filedrop_dir(custom_path)?;
        if filedrop_dir.join(CONFIG_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config = config.unwrap_or_default();
        config.validate()?;

        fs::create_dir_all(&filedrop_dir)?;
        let keys_path = filedrop_dir.join(KEYS_DIR_NAME);
        fs::create_dir_all(&keys_path)?;
        let received_path = filedrop_dir.join(RECEIVED_DIR_NAME);
        fs::create_dir_all(&received_path)?;

        let config_path = filedrop_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            filedrop_dir,
            keys_path,
            received_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the filedrop directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let filedrop_dir = Self::filedrop_dir(custom_path)?;
        if !filedrop_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let keys_path = filedrop_dir.join(KEYS_DIR_NAME);
        let received_path = filedrop_dir.join(RECEIVED_DIR_NAME);
        let config_path = filedrop_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;
        config.validate()?;

        Ok(Self {
            filedrop_dir,
            keys_path,
            received_path,
            config_path,
            config,
        })
    }

    /// Load existing state, or fall back to defaults rooted at the directory
    ///  without touching the filesystem
    pub fn load_or_default(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        match Self::load(custom_path.clone()) {
            Err(StateError::NotInitialized) | Err(StateError::MissingFile(_)) => {
                let filedrop_dir = Self::filedrop_dir(custom_path)?;
                Ok(Self {
                    keys_path: filedrop_dir.join(KEYS_DIR_NAME),
                    received_path: filedrop_dir.join(RECEIVED_DIR_NAME),
                    config_path: filedrop_dir.join(CONFIG_FILE_NAME),
                    filedrop_dir,
                    config: AppConfig::default(),
                })
            }
            other => other,
        }
    }

    /// The keystore rooted at `keys/`
    pub fn keystore(&self) -> Keystore {
        Keystore::new(self.keys_path.clone()).with_key_bits(self.config.key_bits)
    }

    /// Pick the identity to act as: explicit flag, then config
    pub fn identity(&self, explicit: Option<&str>) -> Result<String, StateError> {
        let identity = explicit
            .map(str::to_string)
            .or_else(|| self.config.identity.clone())
            .ok_or(StateError::NoIdentity)?;
        validate_identity(&identity).map_err(|e| StateError::InvalidConfig(e.to_string()))?;
        Ok(identity)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("filedrop directory not initialized. Run 'filedrop init' first")]
    NotInitialized,

    #[error("filedrop directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("no identity given; pass --identity or set `identity` in config.toml")]
    NoIdentity,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
