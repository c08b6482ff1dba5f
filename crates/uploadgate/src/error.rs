//! Error types for the upload gate
//!
//! Every failure the gate can report is an `UploadGateError`. Errors raised by
//! the gate itself carry the `UploadGate:` prefix; errors coming from the
//! storage client or the filesystem are passed through with their own message.

use std::io;

use uploadgate_core::{ErrorMetadata, LogLevel, ValidationError};
use uploadgate_storage::UploadError;

#[derive(Debug, thiserror::Error)]
pub enum UploadGateError {
    #[error("UploadGate: {0}")]
    Configuration(String),

    #[error("UploadGate: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type UploadGateResult<T> = Result<T, UploadGateError>;

impl UploadGateError {
    pub(crate) fn missing_client() -> Self {
        UploadGateError::Configuration("client parameter is required".to_string())
    }

    /// Short tag distinguishing the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            UploadGateError::Configuration(_) => "ConfigurationError",
            UploadGateError::Validation(ValidationError::InvalidMimeType) => "InvalidMimeType",
            UploadGateError::Validation(ValidationError::FileTooLarge) => "FileTooLarge",
            UploadGateError::Upload(_) => "UploadError",
            UploadGateError::Io(_) => "IoError",
        }
    }

    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            UploadGateError::Validation(v) => Some(*v),
            _ => None,
        }
    }
}

impl ErrorMetadata for UploadGateError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadGateError::Configuration(_) => "CONFIGURATION_ERROR",
            UploadGateError::Validation(v) => v.error_code(),
            UploadGateError::Upload(e) => e.error_code(),
            UploadGateError::Io(_) => "IO_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            UploadGateError::Configuration(_) => false,
            UploadGateError::Validation(v) => v.is_recoverable(),
            UploadGateError::Upload(e) => e.is_recoverable(),
            UploadGateError::Io(_) => false,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadGateError::Configuration(_) => LogLevel::Error,
            UploadGateError::Validation(v) => v.log_level(),
            UploadGateError::Upload(e) => e.log_level(),
            UploadGateError::Io(_) => LogLevel::Warn,
        }
    }
}
