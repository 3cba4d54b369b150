use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why an artifact lookup did not produce a file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid percent-encoding in '{0}'")]
    InvalidEncoding(String),

    #[error("path '{0}' escapes the artifact directory")]
    Forbidden(String),

    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Classify a filesystem error for `path`
    ///
    /// Walking through a regular file (`firmware.bin/x`) is an absent entry,
    /// and reading a directory as a file is [`StoreError::IsDirectory`].
    pub(crate) fn from_io(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::NotFound(path),
            io::ErrorKind::IsADirectory => Self::IsDirectory(path),
            _ => Self::Io { path, source },
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::IsDirectory(_))
    }
}
