//! Blob storage for uploaded receipt images.
//!
//! A thin wrapper around `object_store`:
//! - S3-compatible storage in production
//! - On-disk storage for local development
//! - In-memory storage for tests
//!
//! Images are written under `receipts/<account>/<receipt>.<ext>`; the
//! resulting [`ReceiptImage`] is stored on the receipt row.

mod config;

use std::path::Path as FsPath;
use std::sync::Arc;

use bytes::Bytes;
use object_store::ObjectStore;
use object_store::ObjectStoreExt;
use object_store::path::Path;
use portal_core::{AccountId, ReceiptId, ReceiptImage, extension_for_content_type};

pub use config::{DEFAULT_FS_ROOT, S3Config, StorageBackendConfig, StorageConfig};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage config: {0}")]
    InvalidConfig(String),

    #[error("image not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("object_store error: {0}")]
    ObjectStore(object_store::Error),
}

impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { path, .. } => StorageError::NotFound(path),
            other => StorageError::ObjectStore(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    S3,
    Filesystem,
    Memory,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::S3 => "s3",
            StorageKind::Filesystem => "filesystem",
            StorageKind::Memory => "memory",
        }
    }
}

/// Object key for a receipt's image.
pub fn receipt_image_key(account_id: &AccountId, receipt_id: ReceiptId, content_type: &str) -> String {
    format!(
        "receipts/{}/{}.{}",
        account_id,
        receipt_id,
        extension_for_content_type(content_type)
    )
}

#[derive(Clone)]
pub struct Storage {
    kind: StorageKind,
    store: Arc<dyn ObjectStore>,
    prefix: Option<String>,
}

impl Storage {
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    pub async fn new(cfg: StorageConfig) -> Result<Self, StorageError> {
        let (kind, store) = match cfg.backend {
            StorageBackendConfig::S3(s3) => (StorageKind::S3, Arc::new(config::build_s3(s3)?) as _),
            StorageBackendConfig::Filesystem { root } => {
                ensure_dir(&root)?;
                let fs = object_store::local::LocalFileSystem::new_with_prefix(&root)?;
                (StorageKind::Filesystem, Arc::new(fs) as _)
            }
            StorageBackendConfig::Memory => {
                let mem = object_store::memory::InMemory::new();
                (StorageKind::Memory, Arc::new(mem) as _)
            }
        };

        tracing::info!("Receipt image storage ready ({})", kind.as_str());

        Ok(Self {
            kind,
            store,
            prefix: cfg.prefix.and_then(config::non_empty),
        })
    }

    pub async fn from_env() -> Result<Self, StorageError> {
        Self::new(StorageConfig::from_env()?).await
    }

    fn to_path(&self, key: &str) -> Result<Path, StorageError> {
        let key = key.trim_start_matches('/');
        if key.is_empty() {
            return Err(StorageError::InvalidConfig(
                "object key must not be empty".to_string(),
            ));
        }

        let joined = match self.prefix.as_deref().map(|p| p.trim_matches('/')) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}/{key}"),
            _ => key.to_string(),
        };

        Ok(Path::from(joined))
    }

    pub async fn put_bytes(&self, key: &str, bytes: Bytes) -> Result<(), StorageError> {
        let path = self.to_path(key)?;
        self.store
            .put(&path, object_store::PutPayload::from(bytes))
            .await?;
        Ok(())
    }

    pub async fn get_bytes(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self.to_path(key)?;
        let res = self.store.get(&path).await?;
        Ok(res.bytes().await?)
    }

    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.to_path(key)?;
        self.store.delete(&path).await?;
        Ok(())
    }

    /// Store an uploaded image for a receipt.
    pub async fn put_image(
        &self,
        account_id: &AccountId,
        receipt_id: ReceiptId,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ReceiptImage, StorageError> {
        let key = receipt_image_key(account_id, receipt_id, content_type);
        self.put_bytes(&key, Bytes::from(bytes)).await?;
        Ok(ReceiptImage {
            key,
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
        })
    }

    pub async fn get_image(&self, image: &ReceiptImage) -> Result<Bytes, StorageError> {
        self.get_bytes(&image.key).await
    }

    /// Delete a receipt image. A missing object is not an error.
    pub async fn delete_image(&self, image: &ReceiptImage) -> Result<(), StorageError> {
        match self.delete(&image.key).await {
            Ok(()) | Err(StorageError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

fn ensure_dir(root: &FsPath) -> Result<(), StorageError> {
    std::fs::create_dir_all(root)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    fn owner() -> AccountId {
        AccountId::parse("emp-001").unwrap()
    }

    #[test]
    fn image_keys_use_content_type_extension() {
        let id = ReceiptId::new();
        assert_eq!(
            receipt_image_key(&owner(), id, "image/jpeg"),
            format!("receipts/emp-001/{id}.jpg")
        );
    }

    #[tokio::test]
    async fn in_memory_image_lifecycle() -> Result<(), StorageError> {
        let storage = Storage::new(StorageConfig::memory().with_prefix("portal")).await?;
        let image = storage
            .put_image(&owner(), ReceiptId::new(), "lunch.png", "image/png", b"png".to_vec())
            .await?;
        assert_eq!(image.file_name, "lunch.png");
        assert_eq!(storage.get_image(&image).await?, Bytes::from("png"));

        storage.delete_image(&image).await?;
        assert!(matches!(
            storage.get_image(&image).await,
            Err(StorageError::NotFound(_))
        ));
        // Deleting twice is fine
        storage.delete_image(&image).await?;
        Ok(())
    }

    #[tokio::test]
    async fn filesystem_round_trip() -> Result<(), StorageError> {
        let dir = tempfile::tempdir()?;
        let storage = Storage::new(StorageConfig::filesystem(dir.path())).await?;
        assert_eq!(storage.kind(), StorageKind::Filesystem);

        storage.put_bytes("receipts/a.png", Bytes::from("hi")).await?;
        assert_eq!(storage.get_bytes("receipts/a.png").await?, Bytes::from("hi"));
        assert!(storage.put_bytes("/", Bytes::new()).await.is_err());
        Ok(())
    }
}
