//! Configuration module
//!
//! `UploadOptions` is the partially specified input a caller hands to the gate.
//! `UploadConfig` is the resolved, immutable form with every default applied.
//! `StorageConfig` selects and configures the storage client.
//!
//! Defaults are applied field by field. A supplied value equal to its type's
//! empty value (`""`, an empty matcher list, `0`) counts as not supplied.

use std::env;

use anyhow::Context;

use crate::matcher::MimeMatcher;
use crate::storage_types::StorageBackend;

pub const DEFAULT_PATH_PREFIX: &str = "";
/// Zero disables the size check.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 0;

/// Caller-supplied options; every field is optional
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadOptions {
    pub path_prefix: Option<String>,
    pub accepted_mime_types: Option<Vec<MimeMatcher>>,
    pub max_file_size: Option<u64>,
}

impl UploadOptions {
    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    pub fn accepted_mime_types<I, M>(mut self, matchers: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MimeMatcher>,
    {
        self.accepted_mime_types = Some(matchers.into_iter().map(Into::into).collect());
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Load options from `UPLOAD_*` environment variables (and `.env`, if present).
    ///
    /// * `UPLOAD_PATH_PREFIX` - destination prefix
    /// * `UPLOAD_ACCEPTED_MIME_TYPES` - comma separated; `/expr/` entries are patterns
    /// * `UPLOAD_MAX_FILE_SIZE` - limit in bytes
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path_prefix = var("UPLOAD_PATH_PREFIX");

        let accepted_mime_types = var("UPLOAD_ACCEPTED_MIME_TYPES")
            .map(|raw| parse_matcher_list(&raw))
            .transpose()?;

        let max_file_size = var("UPLOAD_MAX_FILE_SIZE")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid UPLOAD_MAX_FILE_SIZE: {}", raw))
            })
            .transpose()?;

        Ok(UploadOptions {
            path_prefix,
            accepted_mime_types,
            max_file_size,
        })
    }
}

fn parse_matcher_list(raw: &str) -> Result<Vec<MimeMatcher>, anyhow::Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<MimeMatcher>()
                .with_context(|| format!("Invalid MIME type pattern: {}", s))
        })
        .collect()
}

/// Resolved upload configuration
#[derive(Clone, Debug, PartialEq)]
pub struct UploadConfig {
    pub path_prefix: String,
    /// Empty means every MIME type is accepted.
    pub accepted_mime_matchers: Vec<MimeMatcher>,
    /// Maximum size in bytes; 0 means no limit.
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            accepted_mime_matchers: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl UploadConfig {
    pub fn resolve(options: Option<UploadOptions>) -> Self {
        let Some(options) = options else {
            return Self::default();
        };

        let path_prefix = options
            .path_prefix
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PATH_PREFIX.to_string());

        let accepted_mime_matchers = options
            .accepted_mime_types
            .filter(|m| !m.is_empty())
            .unwrap_or_default();

        let max_file_size = options
            .max_file_size
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE);

        Self {
            path_prefix,
            accepted_mime_matchers,
            max_file_size,
        }
    }

    pub fn restricts_mime_types(&self) -> bool {
        !self.accepted_mime_matchers.is_empty()
    }

    pub fn limits_file_size(&self) -> bool {
        self.max_file_size > 0
    }
}

impl From<UploadOptions> for UploadConfig {
    fn from(options: UploadOptions) -> Self {
        Self::resolve(Some(options))
    }
}

/// Storage client configuration
#[derive(Clone, Debug, Default)]
pub struct StorageConfig {
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_backend = var("STORAGE_BACKEND")
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?;

        Ok(StorageConfig {
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
        })
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }
}
