use crate::keys::storage_key;
use crate::traits::{
    complete_on_runtime, PutCallback, StorageClient, StoredObject, UploadError, UploadResult,
};
use crate::StorageBackend;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};
use std::path::{Path, PathBuf};

/// S3 storage client
#[derive(Clone)]
pub struct S3StorageClient {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3StorageClient {
    /// Create a new S3StorageClient instance
    ///
    /// Credentials are read from the environment by the object store builder.
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> UploadResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| UploadError::ConfigError(e.to_string()))?;

        Ok(S3StorageClient {
            store,
            bucket,
            region,
            endpoint_url,
        })
    }

    /// Generate public URL for S3 object
    ///
    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path-style: {endpoint}/{bucket}/{key}
    fn generate_url(&self, key: &str) -> String {
        object_url(&self.bucket, &self.region, self.endpoint_url.as_deref(), key)
    }

    async fn store(&self, source_path: PathBuf, dest_path: String) -> UploadResult<StoredObject> {
        let key = storage_key(&dest_path)?;
        let start = std::time::Instant::now();

        let data = tokio::fs::read(&source_path).await.map_err(|e| {
            UploadError::UploadFailed(format!(
                "Failed to read {}: {}",
                source_path.display(),
                e
            ))
        })?;

        let size = data.len() as u64;
        let location = ObjectPath::from(key.clone());

        let result: ObjectResult<_> = self
            .store
            .put(&location, PutPayload::from(Bytes::from(data)))
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            UploadError::UploadFailed(e.to_string())
        })?;

        let url = self.generate_url(&key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(StoredObject {
            key,
            url,
            size_bytes: size,
        })
    }
}

fn object_url(bucket: &str, region: &str, endpoint: Option<&str>, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

impl StorageClient for S3StorageClient {
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
        StorageBackend::S3
    }
}
