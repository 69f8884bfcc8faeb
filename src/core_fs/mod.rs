pub mod chunks;
pub mod error;
pub mod filesystem;
pub mod virtual_path;

pub use chunks::ChunkSource;
pub use error::FsError;
pub use filesystem::LocalFileSystem;
pub use virtual_path::VirtualPath;
