//! Profile picture blob stores.
use super::{AssetStore, StoreError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    fs,
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tokio::fs as tokio_fs;

/// Assets stored as plain files under `<root>/assets`
#[derive(Debug, Clone)]
pub struct FlatFileAssetStore {
    root: PathBuf,
}

impl FlatFileAssetStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().join("assets");
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Resolve `key` below the asset root, refusing anything that could escape it
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let escapes = key.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(StoreError::Backend(format!("invalid asset key {key:?}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetStore for FlatFileAssetStore {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio_fs::create_dir_all(parent).await?;
        }
        tokio_fs::write(&path, bytes).await?;
        tracing::debug!(key, content_type, size = bytes.len(), "asset stored");
        Ok(key.to_string())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio_fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Asset store kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    blobs: Arc<RwLock<HashMap<String, (Vec<u8>, String)>>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StoreError> {
        self.blobs
            .write()
            .insert(key.to_string(), (bytes.to_vec(), content_type.to_string()));
        Ok(key.to_string())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.blobs.write().remove(key);
        Ok(())
    }
}
