//! UploadGate Core Library
//!
//! This crate provides the configuration, MIME matchers, and error types
//! shared by the storage clients and the upload gate itself.

pub mod config;
pub mod error;
pub mod matcher;
pub mod storage_types;

// Re-export commonly used types
pub use config::{StorageConfig, UploadConfig, UploadOptions};
pub use error::{ErrorMetadata, LogLevel, ValidationError};
pub use matcher::MimeMatcher;
pub use storage_types::StorageBackend;
