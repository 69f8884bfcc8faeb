use crate::core_fs::chunks::{ChunkSource, DirEntries, FileChunks};
use crate::core_fs::error::FsError;
use crate::core_fs::virtual_path::VirtualPath;
use crate::constants::DOWNLOAD_BUFFER_SIZE;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// Local directory tree exposed to FTP sessions.
///
/// Every operation takes a [`VirtualPath`] and re-resolves it against the
/// base directory. Nothing outside the base directory is ever opened,
/// created or removed.
#[derive(Debug)]
pub struct LocalFileSystem {
    base_dir: PathBuf,
    download_buffer_size: usize,
}

impl LocalFileSystem {
    /// Opens `base_dir` as the sandbox root. The directory must already exist.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, FsError> {
        let display = base_dir.as_ref().display().to_string();
        let base_dir = base_dir
            .as_ref()
            .canonicalize()
            .map_err(|e| FsError::from_io(e, &display))?;
        if !base_dir.is_dir() {
            return Err(FsError::NotADirectory(display));
        }
        Ok(Self {
            base_dir,
            download_buffer_size: DOWNLOAD_BUFFER_SIZE,
        })
    }

    pub fn with_download_buffer_size(mut self, size: usize) -> Self {
        self.download_buffer_size = size;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Maps a virtual path onto the base directory.
    ///
    /// Fails with [`FsError::Confinement`] when the path climbs above `/`, or
    /// when an existing component (a symbolic link, typically) leads outside
    /// the base directory.
    pub async fn resolve(&self, path: &VirtualPath) -> Result<PathBuf, FsError> {
        let normalized = path.normalize()?;
        let mut real = self.base_dir.clone();
        for segment in normalized.segments() {
            real.push(segment);
        }
        self.check_confined(&real, &normalized).await?;
        Ok(real)
    }

    // The deepest existing ancestor decides: its canonical form must stay
    // under the base directory.
    async fn check_confined(&self, real: &Path, path: &VirtualPath) -> Result<(), FsError> {
        let mut ancestor = real.to_path_buf();
        loop {
            match fs::canonicalize(&ancestor).await {
                Ok(canonical) if canonical.starts_with(&self.base_dir) => return Ok(()),
                Ok(canonical) => {
                    warn!("{} leads outside the base directory: {:?}", path, canonical);
                    return Err(FsError::Confinement(path.to_string()));
                }
                // Dangling link: we can't tell where it would land.
                Err(_) if fs::symlink_metadata(&ancestor).await.is_ok() => {
                    warn!("{} goes through a dangling link: {:?}", path, ancestor);
                    return Err(FsError::Confinement(path.to_string()));
                }
                Err(_) => {
                    if !ancestor.pop() {
                        return Err(FsError::Confinement(path.to_string()));
                    }
                }
            }
        }
    }

    /// Lists the names in a directory, subdirectories with a trailing `/`.
    pub async fn list(&self, path: &VirtualPath) -> Result<DirEntries, FsError> {
        let real = self.resolve(path).await?;
        let metadata = fs::metadata(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;
        if !metadata.is_dir() {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        let entries = fs::read_dir(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;
        Ok(DirEntries::new(entries))
    }

    pub async fn is_directory(&self, path: &VirtualPath) -> bool {
        match self.resolve(path).await {
            Ok(real) => fs::metadata(real).await.map(|m| m.is_dir()).unwrap_or(false),
            Err(_) => false,
        }
    }

    pub async fn exists(&self, path: &VirtualPath) -> bool {
        match self.resolve(path).await {
            Ok(real) => fs::try_exists(real).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Creates a single directory. The parent must exist.
    pub async fn make_directory(&self, path: &VirtualPath) -> Result<(), FsError> {
        let real = self.resolve(path).await?;
        fs::create_dir(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;
        info!("Directory created: {:?}", real);
        Ok(())
    }

    /// Removes an empty directory. The root of the sandbox can't be removed.
    pub async fn remove_directory(&self, path: &VirtualPath) -> Result<(), FsError> {
        if path.normalize()?.is_root() {
            return Err(FsError::InvalidPath(path.to_string()));
        }
        let real = self.resolve(path).await?;
        let metadata = fs::metadata(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;
        if !metadata.is_dir() {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        let mut entries = fs::read_dir(&real).await?;
        if entries.next_entry().await?.is_some() {
            return Err(FsError::DirectoryNotEmpty(path.to_string()));
        }
        fs::remove_dir(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;
        info!("Directory removed: {:?}", real);
        Ok(())
    }

    /// Removes a regular file.
    pub async fn remove_file(&self, path: &VirtualPath) -> Result<(), FsError> {
        let real = self.resolve(path).await?;
        let metadata = fs::metadata(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;
        if metadata.is_dir() {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        fs::remove_file(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;
        info!("File removed: {:?}", real);
        Ok(())
    }

    /// Size in bytes of a regular file.
    pub async fn size(&self, path: &VirtualPath) -> Result<u64, FsError> {
        let real = self.resolve(path).await?;
        let metadata = fs::metadata(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;
        if metadata.is_dir() {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        Ok(metadata.len())
    }

    /// Checks that `path` could be written by [`write_bytes`](Self::write_bytes)
    /// without creating anything.
    pub async fn check_writable(&self, path: &VirtualPath) -> Result<(), FsError> {
        let real = self.resolve(path).await?;
        if fs::metadata(&real).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        let parent_is_dir = match real.parent() {
            Some(parent) => fs::metadata(parent).await.map(|m| m.is_dir()).unwrap_or(false),
            None => false,
        };
        if !parent_is_dir {
            return Err(FsError::NotFound(path.to_string()));
        }
        Ok(())
    }

    /// Writes every chunk of `source` to `path`, replacing any previous content.
    ///
    /// Returns the number of bytes written. A failing source surfaces as
    /// [`FsError::Interrupted`]; whatever arrived before the failure stays on disk.
    pub async fn write_bytes<S: ChunkSource>(
        &self,
        path: &VirtualPath,
        source: &mut S,
    ) -> Result<u64, FsError> {
        let real = self.resolve(path).await?;
        if fs::metadata(&real).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        let mut file = File::create(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;

        let mut written = 0u64;
        while let Some(chunk) = source.next_chunk().await.map_err(FsError::Interrupted)? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            debug!("Wrote {} bytes to {:?}", chunk.len(), real);
        }
        file.flush().await?;
        Ok(written)
    }

    /// Opens a regular file for chunked reading.
    pub async fn read_bytes(&self, path: &VirtualPath) -> Result<FileChunks, FsError> {
        let real = self.resolve(path).await?;
        let metadata = fs::metadata(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;
        if metadata.is_dir() {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        let file = File::open(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.as_str()))?;
        Ok(FileChunks::new(file, self.download_buffer_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use tempfile::TempDir;

    struct Chunks(VecDeque<Vec<u8>>);

    impl ChunkSource for Chunks {
        async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
            Ok(self.0.pop_front())
        }
    }

    struct Failing;

    impl ChunkSource for Failing {
        async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))
        }
    }

    fn sandbox() -> (TempDir, LocalFileSystem) {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystem::new(dir.path()).unwrap();
        (dir, fs)
    }

    fn vp(path: &str) -> VirtualPath {
        VirtualPath::new(path)
    }

    async fn read_all(fs: &LocalFileSystem, path: &str) -> Vec<u8> {
        let mut chunks = fs.read_bytes(&vp(path)).await.unwrap();
        let mut out = Vec::new();
        while let Some(chunk) = chunks.next_chunk().await.unwrap() {
            out.extend(chunk);
        }
        out
    }

    #[test]
    fn test_new_rejects_missing_and_file_base() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            LocalFileSystem::new(dir.path().join("nope")),
            Err(FsError::NotFound(_))
        ));
        let file = dir.path().join("plain");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            LocalFileSystem::new(&file),
            Err(FsError::NotADirectory(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_stays_under_base() {
        let (_dir, fs) = sandbox();
        let cases = [
            "/",
            "/a/b/c",
            "/a/../b",
            "/..",
            "/../../etc/passwd",
            "/a/../../..",
            "a/b/../../../x",
            "/./././..",
        ];
        for case in cases {
            match fs.resolve(&vp(case)).await {
                Ok(real) => assert!(real.starts_with(fs.base_dir()), "{} -> {:?}", case, real),
                Err(e) => assert!(matches!(e, FsError::Confinement(_)), "{}: {}", case, e),
            }
        }
        assert_eq!(fs.resolve(&vp("/")).await.unwrap(), fs.base_dir());
        assert_eq!(fs.resolve(&vp("/a/../b")).await.unwrap(), fs.base_dir().join("b"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_refuses_symlink_escape() {
        let (dir, fs) = sandbox();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("out")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("ghost"), dir.path().join("dangling"))
            .unwrap();

        assert!(matches!(fs.resolve(&vp("/out")).await, Err(FsError::Confinement(_))));
        assert!(matches!(fs.resolve(&vp("/out/new.txt")).await, Err(FsError::Confinement(_))));
        assert!(matches!(fs.resolve(&vp("/dangling")).await, Err(FsError::Confinement(_))));
    }

    #[tokio::test]
    async fn test_predicates_never_fail() {
        let (dir, fs) = sandbox();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("f.txt"), b"hello").unwrap();

        assert!(fs.is_directory(&vp("/")).await);
        assert!(fs.is_directory(&vp("/sub")).await);
        assert!(!fs.is_directory(&vp("/f.txt")).await);
        assert!(!fs.is_directory(&vp("/../..")).await);
        assert!(fs.exists(&vp("/f.txt")).await);
        assert!(!fs.exists(&vp("/missing")).await);
        assert!(!fs.exists(&vp("/..")).await);
    }

    #[tokio::test]
    async fn test_list_marks_directories() {
        let (_dir, fs) = sandbox();
        fs.make_directory(&vp("/a")).await.unwrap();
        fs.make_directory(&vp("/a/inner")).await.unwrap();
        let mut source = Chunks(VecDeque::from(vec![b"C".to_vec()]));
        fs.write_bytes(&vp("/a/f.txt"), &mut source).await.unwrap();

        let mut entries = fs.list(&vp("/a")).await.unwrap();
        let mut names = Vec::new();
        while let Some(name) = entries.next_name().await.unwrap() {
            names.push(name);
        }
        names.sort();
        assert_eq!(names, vec!["f.txt".to_string(), "inner/".to_string()]);
    }

    #[tokio::test]
    async fn test_list_errors() {
        let (dir, fs) = sandbox();
        std::fs::write(dir.path().join("f.txt"), b"x").unwrap();
        assert!(matches!(fs.list(&vp("/nope")).await, Err(FsError::NotFound(_))));
        assert!(matches!(fs.list(&vp("/f.txt")).await, Err(FsError::NotADirectory(_))));
        assert!(matches!(fs.list(&vp("/..")).await, Err(FsError::Confinement(_))));
    }

    #[tokio::test]
    async fn test_make_directory() {
        let (dir, fs) = sandbox();
        fs.make_directory(&vp("/new")).await.unwrap();
        assert!(dir.path().join("new").is_dir());
        assert!(matches!(
            fs.make_directory(&vp("/new")).await,
            Err(FsError::AlreadyExists(_))
        ));
        assert!(matches!(
            fs.make_directory(&vp("/missing/child")).await,
            Err(FsError::NotFound(_))
        ));
        assert!(matches!(
            fs.make_directory(&vp("/../escape")).await,
            Err(FsError::Confinement(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_directory() {
        let (dir, fs) = sandbox();
        fs.make_directory(&vp("/full")).await.unwrap();
        std::fs::write(dir.path().join("full/f"), b"x").unwrap();
        fs.make_directory(&vp("/empty")).await.unwrap();

        fs.remove_directory(&vp("/empty")).await.unwrap();
        assert!(!dir.path().join("empty").exists());
        assert!(matches!(
            fs.remove_directory(&vp("/full")).await,
            Err(FsError::DirectoryNotEmpty(_))
        ));
        assert!(matches!(
            fs.remove_directory(&vp("/full/f")).await,
            Err(FsError::NotADirectory(_))
        ));
        assert!(matches!(
            fs.remove_directory(&vp("/gone")).await,
            Err(FsError::NotFound(_))
        ));
        assert!(matches!(
            fs.remove_directory(&vp("/a/..")).await,
            Err(FsError::InvalidPath(_))
        ));
        assert!(dir.path().is_dir());
    }

    #[tokio::test]
    async fn test_write_then_read_bytes() {
        let (_dir, fs) = sandbox();
        let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let mut source = Chunks(payload.chunks(7000).map(|c| c.to_vec()).collect());
        let written = fs.write_bytes(&vp("/blob.bin"), &mut source).await.unwrap();
        assert_eq!(written, payload.len() as u64);
        assert_eq!(read_all(&fs, "/blob.bin").await, payload);
        assert_eq!(fs.size(&vp("/blob.bin")).await.unwrap(), payload.len() as u64);
    }

    #[tokio::test]
    async fn test_write_replaces_previous_content() {
        let (_dir, fs) = sandbox();
        let mut long = Chunks(VecDeque::from(vec![b"a much longer first version".to_vec()]));
        fs.write_bytes(&vp("/f"), &mut long).await.unwrap();
        let mut empty = Chunks(VecDeque::new());
        assert_eq!(fs.write_bytes(&vp("/f"), &mut empty).await.unwrap(), 0);
        assert!(read_all(&fs, "/f").await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failures() {
        let (dir, fs) = sandbox();
        let mut source = Chunks(VecDeque::from(vec![b"x".to_vec()]));
        assert!(matches!(
            fs.write_bytes(&vp("/../outside.txt"), &mut source).await,
            Err(FsError::Confinement(_))
        ));
        assert!(!dir.path().parent().unwrap().join("outside.txt").exists());
        assert!(matches!(
            fs.write_bytes(&vp("/no/such/dir.txt"), &mut source).await,
            Err(FsError::NotFound(_))
        ));
        assert!(matches!(
            fs.write_bytes(&vp("/f"), &mut Failing).await,
            Err(FsError::Interrupted(_))
        ));
    }

    #[tokio::test]
    async fn test_check_writable() {
        let (dir, fs) = sandbox();
        std::fs::create_dir(dir.path().join("d")).unwrap();
        assert!(fs.check_writable(&vp("/d/new.txt")).await.is_ok());
        assert!(matches!(fs.check_writable(&vp("/d")).await, Err(FsError::IsADirectory(_))));
        assert!(matches!(
            fs.check_writable(&vp("/x/new.txt")).await,
            Err(FsError::NotFound(_))
        ));
        assert!(!dir.path().join("d/new.txt").exists());
    }

    #[tokio::test]
    async fn test_read_bytes_errors() {
        let (_dir, fs) = sandbox();
        fs.make_directory(&vp("/d")).await.unwrap();
        assert!(matches!(fs.read_bytes(&vp("/missing")).await, Err(FsError::NotFound(_))));
        assert!(matches!(fs.read_bytes(&vp("/d")).await, Err(FsError::IsADirectory(_))));
    }

    #[tokio::test]
    async fn test_remove_file_and_size() {
        let (dir, fs) = sandbox();
        std::fs::write(dir.path().join("f"), b"12345").unwrap();
        fs.make_directory(&vp("/d")).await.unwrap();
        assert_eq!(fs.size(&vp("/f")).await.unwrap(), 5);
        assert!(matches!(fs.size(&vp("/d")).await, Err(FsError::IsADirectory(_))));
        assert!(matches!(fs.remove_file(&vp("/d")).await, Err(FsError::IsADirectory(_))));
        fs.remove_file(&vp("/f")).await.unwrap();
        assert!(matches!(fs.size(&vp("/f")).await, Err(FsError::NotFound(_))));
    }
}
