//! Validating upload gate
//!
//! `UploadGate` runs the constraint check, builds the final destination path,
//! and delegates the write to the storage client. Per call the flow is
//! check → put → resume → final path, stopping at the first failure.

use std::path::Path;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use tokio::sync::oneshot;
use uploadgate_core::{ErrorMetadata, LogLevel, UploadConfig, UploadOptions, ValidationError};
use uploadgate_storage::{StorageClient, UploadError};

use crate::error::{UploadGateError, UploadGateResult};
use crate::inspect::{ExtensionMimeLookup, FileStat, FsStat, MimeLookup};
use crate::paths::normalized_join;

/// Validating upload adapter around a storage client.
///
/// Holds no per-call state; clones share the same client and collaborators.
#[derive(Clone)]
pub struct UploadGate {
    client: Arc<dyn StorageClient>,
    config: Arc<UploadConfig>,
    mime_lookup: Arc<dyn MimeLookup>,
    file_stat: Arc<dyn FileStat>,
}

impl UploadGate {
    /// Create a gate with the default MIME lookup and filesystem stat.
    ///
    /// Missing option fields take their defaults: no prefix, every MIME type
    /// accepted, no size limit.
    pub fn new(client: Arc<dyn StorageClient>, options: Option<UploadOptions>) -> Self {
        Self {
            client,
            config: Arc::new(UploadConfig::resolve(options)),
            mime_lookup: Arc::new(ExtensionMimeLookup),
            file_stat: Arc::new(FsStat),
        }
    }

    pub fn builder() -> UploadGateBuilder {
        UploadGateBuilder::default()
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Check `source_path` against the configured constraints.
    ///
    /// The MIME type is checked before the size, so a file failing both
    /// reports `InvalidMimeType`. The size check stats the file (blocking);
    /// a stat failure is returned as `UploadGateError::Io` untouched.
    pub fn check_constraints(&self, source_path: impl AsRef<Path>) -> UploadGateResult<()> {
        let source_path = source_path.as_ref();

        if self.config.restricts_mime_types() {
            let mime_type = self.mime_lookup.lookup(source_path);
            let accepted = self
                .config
                .accepted_mime_matchers
                .iter()
                .any(|matcher| matcher.matches(&mime_type));

            if !accepted {
                tracing::debug!(
                    source = %source_path.display(),
                    mime_type = %mime_type,
                    "Rejected file with unaccepted MIME type"
                );
                return Err(ValidationError::InvalidMimeType.into());
            }
        }

        if self.config.limits_file_size() {
            let size = self.file_stat.size(source_path)?;

            if size > self.config.max_file_size {
                tracing::debug!(
                    source = %source_path.display(),
                    size_bytes = size,
                    max_file_size = self.config.max_file_size,
                    "Rejected file exceeding size limit"
                );
                return Err(ValidationError::FileTooLarge.into());
            }
        }

        Ok(())
    }

    /// Upload `source_path` to `dest_path` under the configured prefix.
    ///
    /// The constraint check and the call to the storage client both happen
    /// before this returns; the future only waits for the client's callback.
    /// It resolves to the final destination path, or to the first error. The
    /// storage client is not invoked when the check fails.
    pub fn upload_file(
        &self,
        source_path: impl AsRef<Path>,
        dest_path: &str,
    ) -> BoxFuture<'static, UploadGateResult<String>> {
        let source_path = source_path.as_ref();

        if let Err(e) = self.check_constraints(source_path) {
            // Validation rejections are already logged by the check itself.
            if e.validation().is_none() {
                log_failure(&e, source_path, dest_path);
            }
            return future::ready(Err(e)).boxed();
        }

        let final_path = normalized_join(&self.config.path_prefix, dest_path);
        let (tx, rx) = oneshot::channel();

        tracing::debug!(
            source = %source_path.display(),
            final_path = %final_path,
            backend = %self.client.backend_type(),
            "Uploading file"
        );

        self.client.put_file(
            source_path,
            &final_path,
            Box::new(move |result| {
                // The receiver is gone only if the caller dropped the future;
                // a successful response must still be drained.
                if let Err(Ok(response)) = tx.send(result) {
                    response.resume();
                }
            }),
        );

        let source = source_path.display().to_string();
        async move {
            let response = match rx.await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    let e = UploadGateError::from(e);
                    log_failure(&e, Path::new(&source), &final_path);
                    return Err(e);
                }
                Err(_) => {
                    let e = UploadGateError::from(UploadError::CallbackDropped);
                    log_failure(&e, Path::new(&source), &final_path);
                    return Err(e);
                }
            };

            response.resume();

            tracing::info!(source = %source, final_path = %final_path, "Upload successful");
            Ok(final_path)
        }
        .boxed()
    }
}

fn log_failure(error: &UploadGateError, source: &Path, dest: &str) {
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_code, source = %source.display(), dest, "Upload rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_code, source = %source.display(), dest, "Upload failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_code, source = %source.display(), dest, "Upload failed");
        }
    }
}

/// Builder for `UploadGate`; `build` fails when no client was supplied.
#[derive(Default)]
pub struct UploadGateBuilder {
    client: Option<Arc<dyn StorageClient>>,
    options: Option<UploadOptions>,
    mime_lookup: Option<Arc<dyn MimeLookup>>,
    file_stat: Option<Arc<dyn FileStat>>,
}

impl UploadGateBuilder {
    pub fn client(mut self, client: Arc<dyn StorageClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn options(mut self, options: UploadOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn mime_lookup(mut self, lookup: Arc<dyn MimeLookup>) -> Self {
        self.mime_lookup = Some(lookup);
        self
    }

    pub fn file_stat(mut self, stat: Arc<dyn FileStat>) -> Self {
        self.file_stat = Some(stat);
        self
    }

    pub fn build(self) -> UploadGateResult<UploadGate> {
        let client = self.client.ok_or_else(UploadGateError::missing_client)?;

        let mut gate = UploadGate::new(client, self.options);
        if let Some(lookup) = self.mime_lookup {
            gate.mime_lookup = lookup;
        }
        if let Some(stat) = self.file_stat {
            gate.file_stat = stat;
        }
        Ok(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use uploadgate_core::{MimeMatcher, StorageBackend};
    use uploadgate_storage::{PutCallback, PutResponse};

    /// Client that records calls and never answers.
    #[derive(Default)]
    struct SilentClient {
        calls: AtomicUsize,
    }

    impl StorageClient for SilentClient {
        fn put_file(&self, _source_path: &Path, _dest_path: &str, _callback: PutCallback) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    struct FixedMime(&'static str);

    impl MimeLookup for FixedMime {
        fn lookup(&self, _path: &Path) -> String {
            self.0.to_string()
        }
    }

    #[derive(Default)]
    struct FakeStat {
        sizes: HashMap<PathBuf, u64>,
        calls: Mutex<Vec<PathBuf>>,
    }

    impl FakeStat {
        fn with(path: &str, size: u64) -> Self {
            let mut stat = FakeStat::default();
            stat.sizes.insert(PathBuf::from(path), size);
            stat
        }
    }

    impl FileStat for FakeStat {
        fn size(&self, path: &Path) -> io::Result<u64> {
            self.calls.lock().unwrap().push(path.to_path_buf());
            self.sizes
                .get(path)
                .copied()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    fn gate(options: UploadOptions, mime: &'static str, stat: Arc<FakeStat>) -> UploadGate {
        UploadGate::builder()
            .client(Arc::new(SilentClient::default()))
            .options(options)
            .mime_lookup(Arc::new(FixedMime(mime)))
            .file_stat(stat)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_without_client_fails() {
        let err = UploadGate::builder().build().err().unwrap();
        assert!(matches!(err, UploadGateError::Configuration(_)));
        assert_eq!(err.to_string(), "UploadGate: client parameter is required");

        let err = UploadGate::builder()
            .options(UploadOptions::default().max_file_size(10))
            .build()
            .err()
            .unwrap();
        assert_eq!(err.kind(), "ConfigurationError");
    }

    #[test]
    fn test_new_populates_defaults() {
        let gate = UploadGate::new(Arc::new(SilentClient::default()), None);
        assert_eq!(gate.config(), &UploadConfig::default());
    }

    #[test]
    fn test_no_constraints_skips_lookups() {
        let stat = Arc::new(FakeStat::default());
        let gate = gate(UploadOptions::default(), "text/plain", stat.clone());

        assert!(gate.check_constraints("anything.bin").is_ok());
        assert!(stat.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_size_boundary_is_inclusive() {
        let stat = Arc::new(FakeStat::with("f.txt", 100));

        for (max, ok) in [(99, false), (100, true), (101, true)] {
            let gate = gate(
                UploadOptions::default().max_file_size(max),
                "text/plain",
                stat.clone(),
            );
            let result = gate.check_constraints("f.txt");
            if ok {
                assert!(result.is_ok(), "max {}", max);
            } else {
                assert_eq!(
                    result.unwrap_err().validation(),
                    Some(ValidationError::FileTooLarge)
                );
            }
        }
    }

    #[test]
    fn test_mime_checked_before_size() {
        let stat = Arc::new(FakeStat::with("f.txt", 5000));
        let gate = gate(
            UploadOptions::default()
                .accepted_mime_types(["image/png"])
                .max_file_size(10),
            "text/plain",
            stat.clone(),
        );

        let err = gate.check_constraints("f.txt").unwrap_err();
        assert_eq!(err.validation(), Some(ValidationError::InvalidMimeType));
        assert!(stat.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_any_matcher_accepts() {
        let stat = Arc::new(FakeStat::default());
        let gate = gate(
            UploadOptions::default().accepted_mime_types(vec![
                MimeMatcher::from("image/"),
                MimeMatcher::pattern("^text/").unwrap(),
            ]),
            "text/markdown",
            stat,
        );

        assert!(gate.check_constraints("notes.md").is_ok());
    }

    #[test]
    fn test_missing_file_surfaces_io_error() {
        let stat = Arc::new(FakeStat::default());
        let gate = gate(UploadOptions::default().max_file_size(10), "text/plain", stat);

        let err = gate.check_constraints("missing.txt").unwrap_err();
        match err {
            UploadGateError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejected_upload_never_reaches_client() {
        let client = Arc::new(SilentClient::default());
        let gate = UploadGate::builder()
            .client(client.clone())
            .options(UploadOptions::default().accepted_mime_types(["image/png"]))
            .mime_lookup(Arc::new(FixedMime("text/plain")))
            .build()
            .unwrap();

        let err = gate.upload_file("f.txt", "/yes.txt").await.unwrap_err();
        assert_eq!(err.validation(), Some(ValidationError::InvalidMimeType));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dropped_callback_resolves_with_error() {
        let client = Arc::new(SilentClient::default());
        let gate = UploadGate::new(client.clone(), None);

        let err = gate.upload_file("f.txt", "/yes.txt").await.unwrap_err();
        assert!(matches!(
            err,
            UploadGateError::Upload(UploadError::CallbackDropped)
        ));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    /// Counts every event emitted while installed.
    struct EventCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCounter {
        fn on_event(
            &self,
            _event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn count_events(f: impl FnOnce()) -> usize {
        use tracing_subscriber::layer::SubscriberExt;

        let events = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(EventCounter(events.clone()));
        tracing::subscriber::with_default(subscriber, f);
        events.load(Ordering::SeqCst)
    }

    #[test]
    fn test_rejected_upload_logged_once() {
        let client = Arc::new(SilentClient::default());
        let gate = UploadGate::builder()
            .client(client)
            .options(UploadOptions::default().accepted_mime_types(["image/png"]))
            .mime_lookup(Arc::new(FixedMime("text/plain")))
            .build()
            .unwrap();

        let events = count_events(|| drop(gate.upload_file("f.txt", "/yes.txt")));
        assert_eq!(events, 1);
    }

    #[test]
    fn test_stat_failure_on_upload_logged_once() {
        let stat = Arc::new(FakeStat::default());
        let gate = gate(UploadOptions::default().max_file_size(10), "text/plain", stat);

        let events = count_events(|| drop(gate.upload_file("missing.txt", "/yes.txt")));
        assert_eq!(events, 1);
    }

    struct CountingResponse(Arc<AtomicUsize>);

    impl PutResponse for CountingResponse {
        fn resume(self: Box<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ImmediateClient {
        resumes: Arc<AtomicUsize>,
        dests: Mutex<Vec<String>>,
    }

    impl StorageClient for ImmediateClient {
        fn put_file(&self, _source_path: &Path, dest_path: &str, callback: PutCallback) {
            self.dests.lock().unwrap().push(dest_path.to_string());
            callback(Ok(Box::new(CountingResponse(self.resumes.clone()))));
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::S3
        }
    }

    #[tokio::test]
    async fn test_synchronous_callback_resolves_final_path() {
        let resumes = Arc::new(AtomicUsize::new(0));
        let client = Arc::new(ImmediateClient {
            resumes: resumes.clone(),
            dests: Mutex::new(Vec::new()),
        });
        let gate = UploadGate::new(
            client.clone(),
            Some(UploadOptions::default().path_prefix("/foo")),
        );

        let final_path = gate.upload_file("f.txt", "/yes.txt").await.unwrap();
        assert_eq!(final_path, "/foo/yes.txt");
        assert_eq!(*client.dests.lock().unwrap(), vec!["/foo/yes.txt"]);
        assert_eq!(resumes.load(Ordering::SeqCst), 1);
    }
}
