use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::core::error::AppError;

/// Local-disk store for uploaded files.
///
/// Files are addressed by their original filename; a second upload with the
/// same name overwrites the first.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create uploads directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` under `filename`, overwriting any existing file
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<(), AppError> {
        let path = self.root.join(filename);
        fs::write(&path, data).await.map_err(|e| {
            AppError::Internal(format!("Failed to store upload {}: {}", filename, e))
        })?;
        debug!("Stored upload: {}", path.display());
        Ok(())
    }

    /// Best-effort removal; a missing file or IO failure is logged, never
    /// surfaced to the caller
    pub async fn delete(&self, filename: &str) {
        let path = self.root.join(filename);
        if let Err(e) = fs::remove_file(&path).await {
            debug!("Could not remove upload {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store(name: &str) -> LocalStore {
        let root = std::env::temp_dir().join("giftdesk-store-tests").join(name);
        let _ = tokio::fs::remove_dir_all(&root).await;
        LocalStore::new(root).await.unwrap()
    }

    #[tokio::test]
    async fn save_overwrites_same_name() {
        let store = test_store("overwrite").await;

        store.save("receipt.pdf", b"first").await.unwrap();
        store.save("receipt.pdf", b"second").await.unwrap();

        let content = tokio::fs::read(store.root().join("receipt.pdf"))
            .await
            .unwrap();
        assert_eq!(content, b"second");
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let store = test_store("delete").await;
        store.save("doc.pdf", b"data").await.unwrap();

        store.delete("doc.pdf").await;

        assert!(!store.root().join("doc.pdf").exists());
    }

    #[tokio::test]
    async fn delete_of_missing_file_is_silent() {
        let store = test_store("delete-missing").await;

        store.delete("never-uploaded.pdf").await;
    }
}
