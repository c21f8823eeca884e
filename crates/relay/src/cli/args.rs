pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "filedrop")]
#[command(about = "Send signed, end-to-end encrypted files through an untrusted relay")]
#[command(version)]
pub struct Args {
    /// Relay URL (defaults to `relay_url` from config, then http://localhost:8000)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the filedrop config directory (defaults to ~/.filedrop)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
