use std::future::Future;
use std::io;
use tokio::fs::{File, ReadDir};
use tokio::io::AsyncReadExt;

/// A pull-based sequence of byte chunks.
///
/// `Ok(None)` means the sequence is exhausted. Restarting requires
/// reopening whatever produced the source.
pub trait ChunkSource: Send {
    fn next_chunk(&mut self) -> impl Future<Output = io::Result<Option<Vec<u8>>>> + Send;
}

/// Chunks read from an open file until end-of-file.
pub struct FileChunks {
    file: File,
    buffer: Vec<u8>,
}

impl FileChunks {
    pub fn new(file: File, buffer_size: usize) -> Self {
        Self {
            file,
            buffer: vec![0; buffer_size.max(1)],
        }
    }
}

impl ChunkSource for FileChunks {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let n = self.file.read(&mut self.buffer).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(self.buffer[..n].to_vec()))
    }
}

/// Lazily enumerated directory entry names.
///
/// Subdirectories carry a trailing `/`. Order is whatever the OS hands back.
pub struct DirEntries {
    entries: ReadDir,
}

impl DirEntries {
    pub(crate) fn new(entries: ReadDir) -> Self {
        Self { entries }
    }

    pub async fn next_name(&mut self) -> io::Result<Option<String>> {
        let entry = match self.entries.next_entry().await? {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await?.is_dir() {
            name.push('/');
        }
        Ok(Some(name))
    }
}

/// One CRLF-terminated line per entry, as sent over a LIST data connection.
impl ChunkSource for DirEntries {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self
            .next_name()
            .await?
            .map(|name| format!("{}\r\n", name).into_bytes()))
    }
}
