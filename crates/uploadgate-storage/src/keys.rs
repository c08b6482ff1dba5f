//! Shared key generation for storage backends.
//!
//! Key format: the destination path with leading `/` removed, e.g. `/foo/yes.txt` -> `foo/yes.txt`.

use crate::traits::{UploadError, UploadResult};

/// Generate a storage key for the given destination path.
///
/// All backends must use this format for consistency.
pub fn storage_key(dest_path: &str) -> UploadResult<String> {
    let key = dest_path.trim_start_matches('/');

    if key.is_empty() {
        return Err(UploadError::InvalidKey(format!(
            "Destination path does not name a file: {}",
            dest_path
        )));
    }

    if key.split('/').any(|segment| segment == "..") {
        return Err(UploadError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    Ok(key.to_string())
}
