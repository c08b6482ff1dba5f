//! Storage client contract
//!
//! This module defines the `StorageClient` trait that all storage backends implement.

use std::future::Future;
use std::path::Path;

use thiserror::Error;
use uploadgate_core::{ErrorMetadata, LogLevel};

use crate::StorageBackend;

/// Errors reported by a storage client through its completion callback
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage client dropped the completion callback without invoking it")]
    CallbackDropped,

    /// Errors from third-party clients, passed through untouched
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::UploadFailed(_) => "UPLOAD_FAILED",
            UploadError::InvalidKey(_) => "INVALID_STORAGE_KEY",
            UploadError::IoError(_) => "STORAGE_IO_ERROR",
            UploadError::ConfigError(_) => "STORAGE_CONFIG_ERROR",
            UploadError::CallbackDropped => "CALLBACK_DROPPED",
            UploadError::Other(_) => "STORAGE_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            UploadError::UploadFailed(_) | UploadError::IoError(_) | UploadError::Other(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::InvalidKey(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

/// Result type for storage operations
pub type UploadResult<T> = Result<T, UploadError>;

/// Response handed to the completion callback on success.
///
/// `resume` must be called once the response is no longer needed; transports
/// that keep a connection or body open for the response release it there.
pub trait PutResponse: Send {
    fn resume(self: Box<Self>);
}

/// Completion callback for `StorageClient::put_file`
pub type PutCallback = Box<dyn FnOnce(UploadResult<Box<dyn PutResponse>>) + Send + 'static>;

/// Storage client trait
///
/// Implementations must invoke `callback` exactly once. They may do so before
/// `put_file` returns or later from another task.
pub trait StorageClient: Send + Sync {
    /// Write the file at `source_path` to `dest_path` on the backend.
    fn put_file(&self, source_path: &Path, dest_path: &str, callback: PutCallback);

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Response produced by the bundled clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub size_bytes: u64,
}

impl PutResponse for StoredObject {
    fn resume(self: Box<Self>) {
        tracing::trace!(key = %self.key, "Storage response drained");
    }
}

/// Run `operation` on the current tokio runtime and hand its outcome to `callback`.
///
/// Without a runtime the callback is invoked immediately with a configuration error.
pub(crate) fn complete_on_runtime<F>(operation: F, callback: PutCallback)
where
    F: Future<Output = UploadResult<StoredObject>> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                let result = operation.await;
                callback(result.map(|object| Box::new(object) as Box<dyn PutResponse>));
            });
        }
        Err(e) => callback(Err(UploadError::ConfigError(format!(
            "No tokio runtime available: {}",
            e
        )))),
    }
}
