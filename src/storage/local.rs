use super::ObjectStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes objects as files under a root directory
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key.trim_start_matches('/'))
    }
}

#[async_trait]
impl ObjectStore for LocalStorage {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let path = self.path_for(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create parent directory")?;
        }

        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    async fn verify_access(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Cannot create {}", self.root.display()))?;
        let meta = tokio::fs::metadata(&self.root).await?;
        if meta.permissions().readonly() {
            anyhow::bail!("{} is read-only", self.root.display());
        }
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("file://{}", self.path_for(key).display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_creates_dirs_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStorage::new(temp_dir.path());

        store.put_object("a/b/batch.json", b"[1]".to_vec()).await.unwrap();
        store.put_object("a/b/batch.json", b"[2]".to_vec()).await.unwrap();

        let written = std::fs::read(temp_dir.path().join("a/b/batch.json")).unwrap();
        assert_eq!(written, b"[2]");
    }

    #[tokio::test]
    async fn test_verify_access_creates_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("out");
        let store = LocalStorage::new(&root);
        store.verify_access().await.unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_location() {
        let store = LocalStorage::new("/data");
        assert_eq!(store.location("/x.json"), "file:///data/x.json");
    }
}
