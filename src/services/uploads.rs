/*
 * Responsibility
 * - persist uploaded file bytes under the configured upload directory
 * - hand back the stored path for the caller to record
 */
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Disk-backed upload storage. Stored names are fresh UUIDs so client
/// filenames never collide or traverse outside the root.
#[derive(Clone, Debug)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `bytes` under the root, keeping the original extension only.
    /// Returns the stored path as recorded on the post.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let stored_name = match Path::new(original_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        let path = self.root.join(stored_name);
        tokio::fs::write(&path, bytes).await?;

        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_bytes_and_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path());

        let path = storage.store("photo.png", b"not-a-real-png").await.unwrap();

        assert!(path.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"not-a-real-png");
        // client filename must not leak into the stored name
        assert!(!path.contains("photo"));
    }

    #[tokio::test]
    async fn extensionless_uploads_are_stored_as_bare_uuids() {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path());

        let path = storage.store("README", b"x").await.unwrap();
        let name = Path::new(&path).file_name().unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(name).is_ok());
    }
}
