//! Source file inspection: MIME type lookup and size.

use std::io;
use std::path::Path;

/// Resolves the MIME type of a file
pub trait MimeLookup: Send + Sync {
    fn lookup(&self, path: &Path) -> String;
}

/// Extension-based lookup; unknown extensions resolve to `application/octet-stream`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionMimeLookup;

impl MimeLookup for ExtensionMimeLookup {
    fn lookup(&self, path: &Path) -> String {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// Reports the byte size of a file, failing if it does not exist
pub trait FileStat: Send + Sync {
    fn size(&self, path: &Path) -> io::Result<u64>;
}

/// Blocking `std::fs::metadata` stat.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStat;

impl FileStat for FsStat {
    fn size(&self, path: &Path) -> io::Result<u64> {
        std::fs::metadata(path).map(|meta| meta.len())
    }
}
