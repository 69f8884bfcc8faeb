mod config;
mod constants;
mod core_cli;
mod core_fs;
mod core_ftpcommand;
mod core_log;
mod core_network;
mod helpers;
mod server;
mod session;

use crate::config::Config;
use crate::core_cli::Cli;
use crate::core_log::logger::init_logger;
use anyhow::Result;
use clap::Parser;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    init_logger(args.verbose);

    // Load configuration from the TOML file, if any
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };
    config.apply_cli(&args);
    config.validate()?;

    // Run the FTP server
    server::run(config).await
}
