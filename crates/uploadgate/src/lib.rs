//! UploadGate
//!
//! A validating upload adapter. `UploadGate` checks a source file against the
//! configured MIME type and size constraints, prefixes the destination path,
//! and hands the file to a storage client.
//!
//! ```no_run
//! # async fn run(client: std::sync::Arc<dyn uploadgate::StorageClient>) -> Result<(), uploadgate::UploadGateError> {
//! use uploadgate::{UploadGate, UploadOptions};
//!
//! let gate = UploadGate::new(
//!     client,
//!     Some(
//!         UploadOptions::default()
//!             .path_prefix("/attachments")
//!             .accepted_mime_types(["image/"])
//!             .max_file_size(5 * 1024 * 1024),
//!     ),
//! );
//!
//! let final_path = gate.upload_file("avatar.png", "/users/42/avatar.png").await?;
//! assert_eq!(final_path, "/attachments/users/42/avatar.png");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gate;
pub mod inspect;
pub mod paths;

pub use error::{UploadGateError, UploadGateResult};
pub use gate::{UploadGate, UploadGateBuilder};
pub use inspect::{ExtensionMimeLookup, FileStat, FsStat, MimeLookup};
pub use paths::normalized_join;
pub use uploadgate_core::{MimeMatcher, UploadConfig, UploadOptions, ValidationError};
pub use uploadgate_storage::{PutCallback, PutResponse, StorageClient, UploadError};
