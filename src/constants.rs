// src/constants.rs

use std::time::Duration;

pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_LISTEN_PORT: u16 = 2121;

/// Idle time after which a silent control connection is dropped.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

pub const CONTROL_BUFFER_SIZE: usize = 8192;
pub const UPLOAD_BUFFER_SIZE: usize = 64 * 1024;
pub const DOWNLOAD_BUFFER_SIZE: usize = 64 * 1024;

/// Verbs we know about but deliberately do nothing for (answered with 202).
pub const SUPERFLUOUS_COMMANDS: [&str; 3] = ["ACCT", "ALLO", "SITE"];

pub const SYSTEM_TYPE: &str = "UNIX Type: L8";
