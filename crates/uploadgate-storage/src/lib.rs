//! UploadGate Storage Library
//!
//! This crate defines the storage client contract the upload gate delegates to,
//! plus implementations for S3 and the local filesystem.
//!
//! # Client contract
//!
//! A client exposes a single callback-style operation: put the file at a source
//! path under a destination path, then invoke the callback exactly once with
//! either an error or a response. On success the receiver must call
//! `PutResponse::resume` to release whatever the transport holds for the response.
//!
//! # Storage key format
//!
//! Destination paths map to keys by dropping leading `/`. Keys must not contain
//! `..` segments. Key generation is centralized in the `keys` module so all
//! backends stay consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage_client;
#[cfg(feature = "storage-local")]
pub use local::LocalStorageClient;
#[cfg(feature = "storage-s3")]
pub use s3::S3StorageClient;
pub use traits::{
    PutCallback, PutResponse, StorageClient, StoredObject, UploadError, UploadResult,
};
pub use uploadgate_core::StorageBackend;
