#[cfg(feature = "storage-local")]
use crate::LocalStorageClient;
#[cfg(feature = "storage-s3")]
use crate::S3StorageClient;
use crate::{StorageBackend, StorageClient, UploadError, UploadResult};
use std::sync::Arc;
use uploadgate_core::StorageConfig;

/// Create a storage client based on configuration
pub async fn create_storage_client(config: &StorageConfig) -> UploadResult<Arc<dyn StorageClient>> {
    let backend = config.storage_backend().unwrap_or(StorageBackend::S3);

    tracing::debug!(backend = %backend, "Creating storage client");

    match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| UploadError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_region()
                .map(String::from)
                .or_else(|| config.aws_region().map(String::from))
                .ok_or_else(|| {
                    UploadError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let client = S3StorageClient::new(bucket, region, endpoint).await?;
            Ok(Arc::new(client))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(UploadError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    UploadError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    UploadError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let client = LocalStorageClient::new(base_path, base_url).await?;
            Ok(Arc::new(client))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(UploadError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
