// Errors for the sandboxed filesystem layer
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsError {
    #[error("Path escapes the base directory: {0}")]
    Confinement(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Is a directory: {0}")]
    IsADirectory(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    #[error("Data connection failed: {0}")]
    Interrupted(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FsError {
    /// Maps a filesystem failure to the reply sent on the control connection.
    ///
    /// The client only ever learns "550"; the cause stays in the server log.
    pub fn to_ftp_response(&self) -> (u16, &'static str) {
        match self {
            FsError::Interrupted(_) => (426, "Connection closed; transfer aborted."),
            _ => (550, "Requested action not taken. File unavailable."),
        }
    }

    /// Builds an error from an `io::Error`, keeping the path for the common kinds.
    pub(crate) fn from_io(err: io::Error, path: &str) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_string()),
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(path.to_string()),
            _ => FsError::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filesystem_errors_collapse_to_550() {
        for err in [
            FsError::Confinement("/..".into()),
            FsError::NotFound("/missing".into()),
            FsError::NotADirectory("/file".into()),
            FsError::AlreadyExists("/dir".into()),
            FsError::DirectoryNotEmpty("/dir".into()),
        ] {
            assert_eq!(err.to_ftp_response().0, 550, "{}", err);
        }
    }

    #[test]
    fn test_only_data_connection_failures_differ() {
        let broken = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert_eq!(FsError::Interrupted(broken).to_ftp_response().0, 426);
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(FsError::Io(denied).to_ftp_response().0, 550);
    }

    #[test]
    fn test_from_io_keeps_path_for_known_kinds() {
        let err = FsError::from_io(io::Error::from(io::ErrorKind::NotFound), "/a");
        assert!(matches!(err, FsError::NotFound(p) if p == "/a"));
        let err = FsError::from_io(io::Error::from(io::ErrorKind::AlreadyExists), "/b");
        assert!(matches!(err, FsError::AlreadyExists(p) if p == "/b"));
    }
}
