use crate::keys::storage_key;
use crate::traits::{
    complete_on_runtime, PutCallback, StorageClient, StoredObject, UploadError, UploadResult,
};
use crate::StorageBackend;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage client
#[derive(Clone)]
pub struct LocalStorageClient {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorageClient {
    /// Create a new LocalStorageClient instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored files (e.g., "/var/lib/uploads")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> UploadResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            UploadError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorageClient {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys whose existing target resolves outside the base directory
    /// (e.g. through a symlink).
    fn key_to_path(&self, key: &str) -> UploadResult<PathBuf> {
        let path = self.base_path.join(key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            UploadError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(UploadError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Generate public URL for file
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> UploadResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn store(&self, source_path: PathBuf, dest_path: String) -> UploadResult<StoredObject> {
        let key = storage_key(&dest_path)?;
        let path = self.key_to_path(&key)?;

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let size = fs::copy(&source_path, &path).await.map_err(|e| {
            UploadError::UploadFailed(format!(
                "Failed to copy {} to {}: {}",
                source_path.display(),
                path.display(),
                e
            ))
        })?;

        let url = self.generate_url(&key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredObject {
            key,
            url,
            size_bytes: size,
        })
    }
}

impl StorageClient for LocalStorageClient {
    fn put_file(&self, source_path: &Path, dest_path: &str, callback: PutCallback) {
        let client = self.clone();
        let source_path = source_path.to_path_buf();
        let dest_path = dest_path.to_string();

        complete_on_runtime(
            async move { client.store(source_path, dest_path).await },
            callback,
        );
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
