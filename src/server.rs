use crate::config::Config;
use crate::core_fs::LocalFileSystem;
use crate::core_network::network;
use anyhow::{Context, Result};
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Runs the FTP server with the provided configuration.
///
/// Opens the base directory, binds the control port and serves clients
/// until the process is stopped.
///
/// # Returns
///
/// Result<(), anyhow::Error> indicating the success or failure of the operation.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config: {:?}", config);

    let fs = open_base_dir(&config)?;
    info!("Serving files from {:?}", fs.base_dir());

    let bind_address = config.server.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    if let Err(e) = network::start_server(listener, Arc::new(config), Arc::new(fs)).await {
        error!("Server stopped: {}", e);
        return Err(e);
    }
    Ok(())
}

pub fn open_base_dir(config: &Config) -> Result<LocalFileSystem> {
    let fs = LocalFileSystem::new(&config.server.base_dir)
        .with_context(|| format!("Invalid base directory: {}", config.server.base_dir))?;
    Ok(fs.with_download_buffer_size(config.server.download_buffer_size))
}
