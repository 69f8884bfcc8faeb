use crate::constants::{
    CONTROL_BUFFER_SIZE, DEFAULT_LISTEN_ADDRESS, DEFAULT_LISTEN_PORT, DOWNLOAD_BUFFER_SIZE,
    IDLE_TIMEOUT, UPLOAD_BUFFER_SIZE,
};
use crate::core_cli::Cli;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    pub base_dir: String,
    pub idle_timeout_secs: u64,
    pub control_buffer_size: usize,
    pub upload_buffer_size: usize,
    pub download_buffer_size: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from(DEFAULT_LISTEN_ADDRESS),
            listen_port: DEFAULT_LISTEN_PORT,
            base_dir: String::new(),
            idle_timeout_secs: IDLE_TIMEOUT.as_secs(),
            control_buffer_size: CONTROL_BUFFER_SIZE,
            upload_buffer_size: UPLOAD_BUFFER_SIZE,
            download_buffer_size: DOWNLOAD_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen_address, self.listen_port)
    }
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Command-line values win over the configuration file.
    pub fn apply_cli(&mut self, args: &Cli) {
        if let Some(address) = &args.listen_address {
            self.server.listen_address = address.clone();
        }
        if let Some(port) = args.port {
            self.server.listen_port = port;
        }
        if let Some(base_dir) = &args.base_dir {
            self.server.base_dir = base_dir.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let server = &self.server;
        if server.base_dir.trim().is_empty() {
            bail!("No base directory configured (set server.base_dir or pass --base-dir)");
        }
        if server.idle_timeout_secs == 0 {
            bail!("server.idle_timeout_secs must be greater than zero");
        }
        if server.control_buffer_size == 0
            || server.upload_buffer_size == 0
            || server.download_buffer_size == 0
        {
            bail!("Buffer sizes must be greater than zero");
        }
        Ok(())
    }
}
