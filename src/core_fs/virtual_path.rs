use crate::core_fs::error::FsError;
use std::fmt;

/// A client-visible, always absolute, POSIX-style path.
///
/// Joining never touches the disk; `.` and `..` are only collapsed by
/// [`VirtualPath::normalize`], which refuses to climb above `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPath(String);

impl VirtualPath {
    pub fn root() -> Self {
        VirtualPath(String::from("/"))
    }

    pub fn new(path: &str) -> Self {
        if path.starts_with('/') {
            VirtualPath(path.to_string())
        } else {
            VirtualPath(format!("/{}", path))
        }
    }

    /// Appends `arg` to this path. An absolute `arg` replaces the path instead.
    pub fn join(&self, arg: &str) -> Self {
        if arg.starts_with('/') {
            VirtualPath::new(arg)
        } else if arg.is_empty() {
            self.clone()
        } else {
            VirtualPath(format!("{}/{}", self.0.trim_end_matches('/'), arg))
        }
    }

    /// Collapses `.`, `..` and repeated separators.
    pub fn normalize(&self) -> Result<VirtualPath, FsError> {
        let mut segments: Vec<&str> = Vec::new();
        for segment in self.0.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    if segments.pop().is_none() {
                        return Err(FsError::Confinement(self.0.clone()));
                    }
                }
                s if s.contains('\\') || s.contains('\0') => {
                    return Err(FsError::InvalidPath(self.0.clone()));
                }
                s => segments.push(s),
            }
        }
        Ok(VirtualPath(format!("/{}", segments.join("/"))))
    }

    /// Segments of an already normalized path, root excluded.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    pub fn is_root(&self) -> bool {
        self.segments().next().is_none()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
