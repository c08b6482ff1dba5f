//! Test doubles for the storage client.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use uploadgate::{PutCallback, PutResponse, StorageClient, UploadError};
use uploadgate_core::StorageBackend;

/// Path to the 1024-byte text fixture.
pub fn big_file_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/big-file.txt")
}

/// Error raised by a third-party storage SDK.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct RemoteError(pub String);

/// What the stub does with the callback it receives.
pub enum Outcome {
    Succeed,
    Fail(String),
    /// Fail with an error type the storage crate does not know about.
    FailRemote(String),
    /// Keep the callback so the test can invoke it later.
    Hold,
}

#[derive(Clone, Default)]
pub struct ResumeCounter(Arc<AtomicUsize>);

impl ResumeCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct StubResponse(ResumeCounter);

impl PutResponse for StubResponse {
    fn resume(self: Box<Self>) {
        (self.0).0.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct StubClient {
    outcome: Outcome,
    pub resumes: ResumeCounter,
    pub calls: Mutex<Vec<(PathBuf, String)>>,
    held: Mutex<Option<PutCallback>>,
}

impl StubClient {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            resumes: ResumeCounter::default(),
            calls: Mutex::new(Vec::new()),
            held: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Invoke a held callback with a successful response.
    pub fn release(&self) {
        let callback = self
            .held
            .lock()
            .unwrap()
            .take()
            .expect("no callback held");
        callback(Ok(Box::new(StubResponse(self.resumes.clone()))));
    }
}

impl StorageClient for StubClient {
    fn put_file(&self, source_path: &Path, dest_path: &str, callback: PutCallback) {
        self.calls
            .lock()
            .unwrap()
            .push((source_path.to_path_buf(), dest_path.to_string()));

        match &self.outcome {
            Outcome::Succeed => callback(Ok(Box::new(StubResponse(self.resumes.clone())))),
            Outcome::Fail(message) => callback(Err(UploadError::UploadFailed(message.clone()))),
            Outcome::FailRemote(message) => callback(Err(UploadError::Other(Box::new(
                RemoteError(message.clone()),
            )))),
            Outcome::Hold => *self.held.lock().unwrap() = Some(callback),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
