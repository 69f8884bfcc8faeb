use crate::config::Config;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use log::{info, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PortError {
    #[error("Malformed PORT argument: {0}")]
    Syntax(String),

    #[error("Data port 0 is not usable")]
    ZeroPort,

    #[error("PORT address {requested} does not match control peer {peer}")]
    AddressMismatch { requested: Ipv4Addr, peer: IpAddr },
}

impl PortError {
    pub fn to_ftp_response(&self) -> (u16, &'static str) {
        (501, "Syntax error in parameters or arguments.")
    }
}

/// Parses `h1,h2,h3,h4,p1,p2` into an IPv4 endpoint (port is `p1 * 256 + p2`).
pub fn parse_port_argument(arg: &str) -> Result<SocketAddrV4, PortError> {
    let fields = arg
        .split(',')
        .map(|field| field.trim().parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| PortError::Syntax(arg.to_string()))?;

    let [h1, h2, h3, h4, p1, p2] = fields[..] else {
        return Err(PortError::Syntax(arg.to_string()));
    };

    let port = u16::from_be_bytes([p1, p2]);
    if port == 0 {
        return Err(PortError::ZeroPort);
    }
    Ok(SocketAddrV4::new(Ipv4Addr::new(h1, h2, h3, h4), port))
}

/// Handles the PORT (Active Mode) FTP command.
///
/// Only records the endpoint; the connection itself is opened by the next
/// transfer command.
pub async fn handle_port_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let result = match parse_port_argument(&arg) {
        Ok(endpoint) => {
            let mut session = session.lock().await;
            if let Some(previous) = session.pending_data_endpoint() {
                info!("Replacing unused data endpoint {}", previous);
            }
            session.set_data_endpoint(endpoint).map(|_| endpoint)
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(endpoint) => {
            info!("Data endpoint set to {}", endpoint);
            send_reply(&writer, 200, "PORT command successful.").await
        }
        Err(e) => {
            warn!("PORT rejected: {}", e);
            let (code, text) = e.to_ftp_response();
            send_reply(&writer, code, text).await
        }
    }
}
