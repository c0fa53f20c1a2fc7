//! Uploaded media files.
//!
//! Resources reference uploads by public path (`/uploads/<file>`). The
//! store writes files under a local directory that the HTTP layer serves
//! read-only.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use common::{AppError, AppResult};
use uuid::Uuid;

/// Public URL prefix of stored uploads
pub const PUBLIC_PREFIX: &str = "/uploads/";

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist an upload and return its public path.
    async fn save(&self, original_name: &str, bytes: Vec<u8>) -> AppResult<String>;

    /// Delete the file behind a public path. References that do not point
    /// into the upload directory are ignored.
    async fn remove(&self, public_path: &str) -> AppResult<()>;
}

/// Stores uploads on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a public path to a file inside the root, rejecting anything that
    /// could escape it.
    fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path.strip_prefix(PUBLIC_PREFIX)?;
        let valid = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        valid.then(|| self.root.join(name))
    }
}

/// Lower-cased alphanumeric extension of the client file name, if any.
fn extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    let valid = !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save(&self, original_name: &str, bytes: Vec<u8>) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::internal(format!("create upload dir: {}", e)))?;

        let file_name = match extension(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        tokio::fs::write(self.root.join(&file_name), bytes)
            .await
            .map_err(|e| AppError::internal(format!("write upload: {}", e)))?;

        tracing::debug!(file = %file_name, "Stored upload");
        Ok(format!("{}{}", PUBLIC_PREFIX, file_name))
    }

    async fn remove(&self, public_path: &str) -> AppResult<()> {
        let Some(path) = self.resolve(public_path) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!(
                "remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> LocalMediaStore {
        LocalMediaStore::new(std::env::temp_dir().join(format!("media-{}", Uuid::new_v4())))
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = store();
        assert!(store.resolve("/uploads/a.png").is_some());
        assert!(store.resolve("/uploads/../secret").is_none());
        assert!(store.resolve("/uploads/..").is_none());
        assert!(store.resolve("https://cdn.example.com/a.png").is_none());
    }

    #[test]
    fn test_extension_sanitized() {
        assert_eq!(extension("Photo.PNG"), Some("png".to_string()));
        assert_eq!(extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(extension("noext"), None);
        assert_eq!(extension("bad.p$p"), None);
    }

    #[tokio::test]
    async fn test_save_then_remove() {
        let store = store();
        let public = store.save("apple.png", vec![1, 2, 3]).await.unwrap();
        assert!(public.starts_with(PUBLIC_PREFIX));
        assert!(public.ends_with(".png"));

        let path = store.resolve(&public).unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![1, 2, 3]);

        store.remove(&public).await.unwrap();
        assert!(!path.exists());
        // Removing twice is not an error
        store.remove(&public).await.unwrap();
    }
}
