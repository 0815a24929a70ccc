//! Shared fakes for integration testing: kernels, factories and storage.

#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use serde_json::json;
use tokio::runtime::Handle;

use kernel_bridge::config::{Exchange, ServerContext};
use kernel_bridge::kernel::{
    ApplicationRequest, ApplicationResponse, EventBusSubscriber, Kernel, KernelError,
    KernelFactory, OutputSink, PreloadableKernel, ServiceContainer, TracingOutput,
};
use kernel_bridge::upload::{ExtensionMap, LocalFilesystem, TempStorage};
use kernel_bridge::{AdapterError, KernelBridge};

/// Counters shared between a test and the kernels it builds.
#[derive(Debug, Default)]
pub struct CallLog {
    pub built: AtomicUsize,
    pub booted: AtomicUsize,
    pub preloaded: AtomicUsize,
    pub handled: AtomicUsize,
    pub shut_down: AtomicUsize,
    pub exchanges: Mutex<Vec<String>>,
}

impl CallLog {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn exchanges(&self) -> Vec<String> {
        self.exchanges.lock().unwrap().clone()
    }
}

/// Construction stage a fake kernel should fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Boot,
    Preload,
    Subscribe,
}

/// Kernel with a handful of fixed routes.
pub struct FakeKernel {
    environment: String,
    debug: bool,
    container: ServiceContainer,
    calls: Arc<CallLog>,
    subscribes: bool,
    fail_at: Option<FailAt>,
}

#[async_trait]
impl Kernel for FakeKernel {
    fn environment(&self) -> &str {
        &self.environment
    }

    fn is_debug(&self) -> bool {
        self.debug
    }

    fn boot(&mut self) -> Result<(), KernelError> {
        self.calls.booted.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(FailAt::Boot) {
            return Err(KernelError::Boot("missing config/app.toml".into()));
        }
        if self.subscribes {
            let subscriber: Arc<dyn EventBusSubscriber> = Arc::new(RecordingSubscriber {
                calls: self.calls.clone(),
                fails: self.fail_at == Some(FailAt::Subscribe),
            });
            self.container.set(subscriber);
        }
        Ok(())
    }

    fn container(&self) -> &ServiceContainer {
        &self.container
    }

    fn container_mut(&mut self) -> &mut ServiceContainer {
        &mut self.container
    }

    async fn handle_async(
        &self,
        request: ApplicationRequest,
    ) -> Result<ApplicationResponse, KernelError> {
        self.calls.handled.fetch_add(1, Ordering::SeqCst);

        match request.path() {
            "/echo" => {
                let body = json!({
                    "method": request.method().as_str(),
                    "path": request.path(),
                    "query": request.query(),
                    "cookies": request.cookies(),
                    "parsed": request.parsed_body(),
                    "content": String::from_utf8_lossy(request.content()),
                    "server_name": request.server_name(),
                    "environment": self.environment,
                });
                Ok(ApplicationResponse::ok(body.to_string())
                    .with_header("Content-Type", "application/json")
                    .with_header("X-Kernel", "fake"))
            }
            "/upload" => {
                let mut files = Vec::new();
                for file in request.files() {
                    let contents = match file.path() {
                        Some(path) => tokio::fs::read(path)
                            .await
                            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                            .ok(),
                        None => None,
                    };
                    files.push(json!({
                        "field": file.field(),
                        "filename": file.client_filename(),
                        "media_type": file.client_media_type(),
                        "error": file.error().code(),
                        "path": file.path().map(|p| p.display().to_string()),
                        "contents": contents,
                    }));
                }
                Ok(ApplicationResponse::ok(json!({ "files": files }).to_string()))
            }
            "/slow-upload" => {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Ok(ApplicationResponse::ok("late"))
            }
            "/created" => Ok(ApplicationResponse::new(StatusCode::CREATED)
                .with_header("Set-Cookie", "a=1")
                .with_header("Set-Cookie", "b=2")),
            "/boom" => Err(KernelError::application(io::Error::other("database is gone"))),
            path => Err(KernelError::RouteNotFound(format!(
                "No route found for \"{} {}\"",
                request.method(),
                path
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), KernelError> {
        self.calls.shut_down.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn into_preloadable(self: Box<Self>) -> Option<Box<dyn PreloadableKernel>> {
        Some(self)
    }
}

#[async_trait]
impl PreloadableKernel for FakeKernel {
    async fn preload(&self) -> Result<(), KernelError> {
        self.calls.preloaded.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(FailAt::Preload) {
            return Err(KernelError::Preload("route cache unavailable".into()));
        }
        Ok(())
    }
}

/// Event bus subscriber that remembers the exchanges it was given.
struct RecordingSubscriber {
    calls: Arc<CallLog>,
    fails: bool,
}

#[async_trait]
impl EventBusSubscriber for RecordingSubscriber {
    async fn subscribe_to_exchanges(
        &self,
        exchanges: &[Exchange],
        output: Arc<dyn OutputSink>,
    ) -> Result<(), KernelError> {
        if self.fails {
            return Err(KernelError::Subscription("broker refused connection".into()));
        }
        let mut seen = self.calls.exchanges.lock().unwrap();
        for exchange in exchanges {
            output.write_line(&format!("Subscribed to {}", exchange));
            seen.push(exchange.to_string());
        }
        Ok(())
    }
}

/// Factory for `FakeKernel`.
#[derive(Default, Clone)]
pub struct FakeFactory {
    pub calls: Arc<CallLog>,
    pub subscribes: bool,
    pub fail_at: Option<FailAt>,
}

impl FakeFactory {
    pub fn subscribing() -> Self {
        Self {
            subscribes: true,
            ..Self::default()
        }
    }

    pub fn failing_at(stage: FailAt) -> Self {
        Self {
            subscribes: true,
            fail_at: Some(stage),
            ..Self::default()
        }
    }
}

impl KernelFactory for FakeFactory {
    fn build(&self, environment: &str, debug: bool) -> Box<dyn Kernel> {
        self.calls.built.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeKernel {
            environment: environment.to_string(),
            debug,
            container: ServiceContainer::new(),
            calls: self.calls.clone(),
            subscribes: self.subscribes,
            fail_at: self.fail_at,
        })
    }
}

/// Kernel without async preloading.
pub struct SyncKernel {
    container: ServiceContainer,
}

#[async_trait]
impl Kernel for SyncKernel {
    fn environment(&self) -> &str {
        "dev"
    }

    fn is_debug(&self) -> bool {
        false
    }

    fn boot(&mut self) -> Result<(), KernelError> {
        Ok(())
    }

    fn container(&self) -> &ServiceContainer {
        &self.container
    }

    fn container_mut(&mut self) -> &mut ServiceContainer {
        &mut self.container
    }

    async fn handle_async(
        &self,
        _request: ApplicationRequest,
    ) -> Result<ApplicationResponse, KernelError> {
        Ok(ApplicationResponse::ok("sync"))
    }

    async fn shutdown(&self) -> Result<(), KernelError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct SyncFactory;

impl KernelFactory for SyncFactory {
    fn build(&self, _environment: &str, _debug: bool) -> Box<dyn Kernel> {
        Box::new(SyncKernel {
            container: ServiceContainer::new(),
        })
    }
}

/// Local storage that counts writes and removes.
pub struct RecordingStorage {
    inner: LocalFilesystem,
    pub writes: AtomicUsize,
    pub removes: AtomicUsize,
    partial_writes: bool,
}

impl RecordingStorage {
    pub fn new(dir: &Path) -> Self {
        Self {
            inner: LocalFilesystem::new(dir),
            writes: AtomicUsize::new(0),
            removes: AtomicUsize::new(0),
            partial_writes: false,
        }
    }

    /// Storage whose writes stop after one byte and then fail.
    pub fn partial(dir: &Path) -> Self {
        Self {
            partial_writes: true,
            ..Self::new(dir)
        }
    }
}

#[async_trait]
impl TempStorage for RecordingStorage {
    fn temp_dir(&self) -> &Path {
        self.inner.temp_dir()
    }

    async fn write(&self, path: &Path, contents: Bytes) -> io::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.partial_writes {
            self.inner.write(path, contents.slice(..1)).await?;
            return Err(io::Error::other("no space left on device"));
        }
        self.inner.write(path, contents).await
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(path).await
    }
}

/// Build a ready bridge around `factory`.
pub async fn start_bridge(
    factory: &FakeFactory,
    root: PathBuf,
    context: ServerContext,
    storage: Arc<RecordingStorage>,
) -> Result<KernelBridge<FakeFactory>, AdapterError> {
    KernelBridge::with_factory(
        factory,
        Handle::current(),
        root,
        context,
        Arc::new(TracingOutput),
        Arc::new(ExtensionMap::new()),
        storage,
    )
    .await
}

/// Poll until `dir` has no entries left.
pub async fn wait_until_empty(dir: &Path) -> bool {
    for _ in 0..100 {
        if std::fs::read_dir(dir).map(|entries| entries.count() == 0).unwrap_or(true) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Poll until `path` no longer exists.
pub async fn wait_until_removed(path: &Path) -> bool {
    for _ in 0..100 {
        if !path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
