// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{
    args::Args, op::Op, Health, Init, Keygen, List, Receive, Register, Relay, SendFile, Version,
};

command_enum! {
    (Health, Health),
    (Init, Init),
    (Keygen, Keygen),
    (List, List),
    (Receive, Receive),
    (Register, Register),
    (Relay, Relay),
    (Send, SendFile),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // The relay installs its own subscriber
    if !matches!(args.command, Command::Relay(_)) {
        filedrop_relay::init_cli_logging();
    }

    let ctx = match cli::op::OpContext::new(args.remote, args.config_path) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
