//! Error types module
//!
//! Constraint violations are reported as `ValidationError`. The `ErrorMetadata`
//! trait lets each crate's error type describe how it should be tagged and logged.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be tagged and reported
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "INVALID_MIME_TYPE")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same call could succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// A pre-upload constraint that the source file failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid file mimetype")]
    InvalidMimeType,

    #[error("File too big")]
    FileTooLarge,
}

impl ErrorMetadata for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidMimeType => "INVALID_MIME_TYPE",
            ValidationError::FileTooLarge => "FILE_TOO_LARGE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}
