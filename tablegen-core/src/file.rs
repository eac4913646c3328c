use std::{
    io,
    path::{Path, PathBuf},
};

/// Write `content` to `path`, fully replacing any existing file.
///
/// The parent directory must already exist. Files are created with the
/// platform default mode (`0o666` minus the umask on Unix).
pub fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
    std::fs::write(path, content)
}

/// A generated file waiting to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
    content: Vec<u8>,
}

impl File {
    /// Create a new file with the given path and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Write the file, replacing whatever is on disk
    pub fn write(&self) -> io::Result<()> {
        write_file(&self.path, &self.content)
    }
}
