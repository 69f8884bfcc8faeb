use crate::core_fs::{FsError, LocalFileSystem, VirtualPath};
use crate::core_network::port::PortError;
use log::{info, warn};
use std::net::{IpAddr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

/// Per-connection state.
///
/// `current_dir` only moves through [`Session::change_directory`] and the
/// data endpoint only through [`Session::set_data_endpoint`] /
/// [`Session::take_data_endpoint`].
#[derive(Debug)]
pub struct Session {
    current_dir: VirtualPath,
    pending_data_endpoint: Option<SocketAddrV4>,
    peer_addr: SocketAddr,
    username: Option<String>,
    fs: Arc<LocalFileSystem>,
}

impl Session {
    pub fn new(fs: Arc<LocalFileSystem>, peer_addr: SocketAddr) -> Self {
        Self {
            current_dir: VirtualPath::root(),
            pending_data_endpoint: None,
            peer_addr,
            username: None,
            fs,
        }
    }

    pub fn current_dir(&self) -> &VirtualPath {
        &self.current_dir
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn fs(&self) -> &LocalFileSystem {
        &self.fs
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, username: &str) {
        self.username = Some(username.to_string());
    }

    /// Path a command argument refers to, relative to the current directory.
    pub fn virtual_path(&self, arg: &str) -> VirtualPath {
        self.current_dir.join(arg)
    }

    /// Moves to `arg` if it names a directory inside the sandbox.
    pub async fn change_directory(&mut self, arg: &str) -> Result<&VirtualPath, FsError> {
        let target = self.virtual_path(arg).normalize()?;
        if !self.fs.is_directory(&target).await {
            return Err(FsError::NotADirectory(target.to_string()));
        }
        info!("Directory changed: {} -> {}", self.current_dir, target);
        self.current_dir = target;
        Ok(&self.current_dir)
    }

    /// Records where the next transfer connects to.
    ///
    /// The address must be the one the control connection comes from, so a
    /// client can't aim our data connections at a third party.
    pub fn set_data_endpoint(&mut self, endpoint: SocketAddrV4) -> Result<(), PortError> {
        let peer_ip = self.peer_addr.ip().to_canonical();
        if IpAddr::V4(*endpoint.ip()) != peer_ip {
            warn!(
                "PORT to {} refused: control connection comes from {}",
                endpoint, peer_ip
            );
            return Err(PortError::AddressMismatch {
                requested: *endpoint.ip(),
                peer: peer_ip,
            });
        }
        self.pending_data_endpoint = Some(endpoint);
        Ok(())
    }

    pub fn pending_data_endpoint(&self) -> Option<SocketAddrV4> {
        self.pending_data_endpoint
    }

    /// Consumes the endpoint set by the last PORT command.
    pub fn take_data_endpoint(&mut self) -> Option<SocketAddrV4> {
        self.pending_data_endpoint.take()
    }
}
