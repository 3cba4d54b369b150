//! Artifact store
//!
//! Filesystem accessor for the firmware directory. Every lookup reads current
//! on-disk state; nothing is cached, written, or locked.

mod error;
pub mod path;

pub use error::StoreError;

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// An opened regular file below the base directory
#[derive(Debug)]
pub struct Artifact {
    /// Requested path joined onto the base directory (not canonicalized)
    pub path: PathBuf,
    pub file: fs::File,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Read-only view of the artifact directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    base_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path a decoded request name maps to, for logging; not validated
    pub fn display_path(&self, decoded: &str) -> PathBuf {
        self.base_dir.join(decoded.trim_start_matches('/'))
    }

    /// Resolve a decoded relative path and confine it to the base directory
    ///
    /// Returns the canonical location of an existing entry.
    pub async fn resolve(&self, decoded: &str) -> Result<PathBuf, StoreError> {
        let relative = path::sanitize_relative(decoded)?;
        let joined = self.base_dir.join(&relative);

        let base = fs::canonicalize(&self.base_dir)
            .await
            .map_err(|e| StoreError::from_io(self.base_dir.clone(), e))?;
        let target = fs::canonicalize(&joined)
            .await
            .map_err(|e| StoreError::from_io(joined.clone(), e))?;

        // Symlinks may still point outside after the lexical checks
        if !target.starts_with(&base) {
            return Err(StoreError::Forbidden(decoded.to_string()));
        }

        Ok(target)
    }

    /// Open a regular file for streaming
    pub async fn open(&self, decoded: &str) -> Result<Artifact, StoreError> {
        let target = self.resolve(decoded).await?;
        let path = self.display_path(decoded);

        let metadata = fs::metadata(&target)
            .await
            .map_err(|e| StoreError::from_io(path.clone(), e))?;
        if metadata.is_dir() {
            return Err(StoreError::IsDirectory(path));
        }

        let file = fs::File::open(&target)
            .await
            .map_err(|e| StoreError::from_io(path.clone(), e))?;

        Ok(Artifact {
            path,
            file,
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    /// Read a version record and return its trimmed contents
    ///
    /// Invalid UTF-8 is replaced rather than treated as a read failure.
    pub async fn read_version(&self, decoded: &str) -> Result<String, StoreError> {
        let target = self.resolve(decoded).await?;
        let path = self.display_path(decoded);

        let bytes = fs::read(&target)
            .await
            .map_err(|e| StoreError::from_io(path, e))?;
        let text = String::from_utf8_lossy(&bytes);

        Ok(path::trim_version(&text).to_string())
    }

    /// Whether the decoded path names an existing directory below the base
    pub async fn is_dir(&self, decoded: &str) -> bool {
        match self.resolve(decoded).await {
            Ok(target) => fs::metadata(target).await.is_ok_and(|m| m.is_dir()),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn setup() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("firmware.bin"), b"\x7fELF-firmware").unwrap();
        std::fs::write(dir.path().join("firmware.bin.version"), "1.2.3\n  ").unwrap();
        std::fs::create_dir(dir.path().join("esp32")).unwrap();
        let store = ArtifactStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_existing_file() {
        let (_dir, store) = setup();
        let mut artifact = store.open("firmware.bin").await.unwrap();
        assert_eq!(artifact.len, 13);
        assert!(artifact.path.ends_with("firmware.bin"));

        let mut content = Vec::new();
        artifact.file.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"\x7fELF-firmware");
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let (_dir, store) = setup();
        let err = store.open("missing.bin").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_open_directory_is_not_a_file() {
        let (_dir, store) = setup();
        let err = store.open("esp32").await.unwrap_err();
        assert!(matches!(err, StoreError::IsDirectory(_)));
        assert!(store.is_dir("esp32").await);
        assert!(store.is_dir("").await);
        assert!(!store.is_dir("firmware.bin").await);
    }

    #[tokio::test]
    async fn test_file_used_as_directory_is_not_found() {
        let (_dir, store) = setup();
        let err = store.open("firmware.bin/x").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        let err = store.read_version("firmware.bin/x").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_version_of_directory() {
        let (_dir, store) = setup();
        let err = store.read_version("esp32").await.unwrap_err();
        assert!(matches!(err, StoreError::IsDirectory(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_loop_is_io_error() {
        let (dir, store) = setup();
        std::os::unix::fs::symlink("loop.version", dir.path().join("loop.version")).unwrap();

        let err = store.read_version("loop.version").await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[tokio::test]
    async fn test_read_version_trims() {
        let (_dir, store) = setup();
        assert_eq!(store.read_version("firmware.bin.version").await.unwrap(), "1.2.3");
    }

    #[tokio::test]
    async fn test_read_version_lossy_utf8() {
        let (dir, store) = setup();
        std::fs::write(dir.path().join("odd.version"), b"1.0\xff\n").unwrap();
        assert_eq!(store.read_version("odd.version").await.unwrap(), "1.0\u{fffd}");
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let (_dir, store) = setup();
        let err = store.open("../outside-secret").await.unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
        let err = store.read_version("esp32/../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_rejected() {
        let (dir, store) = setup();
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.bin"), b"secret").unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.bin"),
            dir.path().join("link.bin"),
        )
        .unwrap();

        let err = store.open("link.bin").await.unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_missing_base_dir() {
        let store = ArtifactStore::new("/nonexistent/ota-updates");
        let err = store.read_version("firmware.bin.version").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
