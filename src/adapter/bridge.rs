//! The kernel bridge: lifecycle owner and request pipeline.
//!
//! # Responsibilities
//! - Build the kernel for the context's environment/debug flag
//! - Reject kernels without async preloading
//! - Boot, register the event loop, preload, subscribe to exchanges
//! - Run each request through translate → kernel → translate back
//! - Hand temp uploads to the reaper without waiting for it
//! - Delegate shutdown to the kernel

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::adapter::translate::RequestTranslator;
use crate::adapter::{KernelAdapter, ObservableKernel};
use crate::config::ServerContext;
use crate::error::AdapterError;
use crate::http::{TransportRequest, TransportResponse};
use crate::kernel::{
    EventBusSubscriber, EventLoop, Kernel, KernelFactory, OutputSink, PreloadableKernel,
};
use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::observability::metrics;
use crate::upload::{MimeTypeChecker, TempFileReaper, TempStorage, UploadMaterializer};

/// Adapter that drives kernels produced by `F`.
pub struct KernelBridge<F> {
    kernel: Arc<dyn PreloadableKernel>,
    translator: RequestTranslator,
    reaper: TempFileReaper,
    lifecycle: Lifecycle,
    context: Arc<ServerContext>,
    root_path: PathBuf,
    _factory: PhantomData<fn() -> F>,
}

impl<F: KernelFactory> KernelBridge<F> {
    /// Create a ready bridge using an explicit factory instance.
    pub async fn with_factory(
        factory: &F,
        event_loop: Handle,
        root_path: PathBuf,
        context: ServerContext,
        output: Arc<dyn OutputSink>,
        mime: Arc<dyn MimeTypeChecker>,
        storage: Arc<dyn TempStorage>,
    ) -> Result<Self, AdapterError> {
        let lifecycle = Lifecycle::new();

        tracing::info!(
            environment = %context.environment(),
            debug = context.is_debug(),
            root = %root_path.display(),
            "Creating kernel"
        );
        let kernel = factory.build(context.environment(), context.is_debug());
        lifecycle.advance(LifecycleState::Constructed);

        let mut kernel = kernel.into_preloadable().ok_or_else(|| {
            tracing::error!("Kernel does not support async preloading");
            AdapterError::construction(
                LifecycleState::Constructed,
                "kernel does not support async preloading",
            )
        })?;

        kernel
            .boot()
            .map_err(|e| {
                AdapterError::construction_from(LifecycleState::Constructed, "kernel boot failed", e)
            })?;
        kernel
            .container_mut()
            .set(EventLoop::new(event_loop.clone()));
        lifecycle.advance(LifecycleState::Booted);

        let kernel: Arc<dyn PreloadableKernel> = Arc::from(kernel);
        kernel
            .preload()
            .await
            .map_err(|e| {
                AdapterError::construction_from(LifecycleState::Booted, "kernel preload failed", e)
            })?;
        lifecycle.advance(LifecycleState::Preloaded);
        tracing::info!("Kernel preloaded");

        if context.has_exchanges() {
            let subscriber = kernel
                .container()
                .get::<Arc<dyn EventBusSubscriber>>()
                .cloned();
            match subscriber {
                Some(subscriber) => {
                    tracing::info!(exchanges = context.exchanges().len(), "Subscribing to exchanges");
                    subscriber
                        .subscribe_to_exchanges(context.exchanges(), output)
                        .await
                        .map_err(|e| {
                            AdapterError::construction_from(
                                LifecycleState::Preloaded,
                                "exchange subscription failed",
                                e,
                            )
                        })?;
                }
                None => {
                    tracing::debug!("Kernel has no event bus subscriber, skipping exchanges");
                }
            }
        }

        let context = Arc::new(context);
        let translator = RequestTranslator::new(
            context.clone(),
            UploadMaterializer::new(storage.clone(), mime),
        );
        let reaper = TempFileReaper::new(storage, event_loop);

        lifecycle.advance(LifecycleState::Ready);
        tracing::info!("Kernel ready");

        Ok(Self {
            kernel,
            translator,
            reaper,
            lifecycle,
            context,
            root_path,
            _factory: PhantomData,
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.current()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.lifecycle.subscribe()
    }

    pub fn context(&self) -> &ServerContext {
        &self.context
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn kernel(&self) -> &Arc<dyn PreloadableKernel> {
        &self.kernel
    }
}

impl<F> ObservableKernel for KernelBridge<F> {
    fn observable_folders() -> &'static [&'static str] {
        &["src", "config", "public", "views"]
    }

    fn observable_extensions() -> &'static [&'static str] {
        &["rs", "toml", "yaml", "yml", "json", "html", "css", "js"]
    }
}

#[async_trait]
impl<F: KernelFactory + Default> KernelAdapter for KernelBridge<F> {
    async fn create(
        event_loop: Handle,
        root_path: PathBuf,
        context: ServerContext,
        output: Arc<dyn OutputSink>,
        mime: Arc<dyn MimeTypeChecker>,
        storage: Arc<dyn TempStorage>,
    ) -> Result<Self, AdapterError> {
        let factory = F::default();
        Self::with_factory(&factory, event_loop, root_path, context, output, mime, storage).await
    }

    async fn handle(&self, request: TransportRequest) -> Result<TransportResponse, AdapterError> {
        let state = self.lifecycle.current();
        if !state.accepts_requests() {
            return Err(AdapterError::NotReady(state));
        }

        let start = Instant::now();
        let method = request.method.clone();
        let path = request.path.clone();

        // Deletes launch when the guard drops, even if this future is
        // cancelled mid-flight.
        let reap = self.reaper.guard();
        let request = self.translator.translate(request, reap.tracker()).await;

        let outcome = self
            .kernel
            .handle_async(request)
            .await
            .map(TransportResponse::from)
            .map_err(AdapterError::from);
        drop(reap);

        match &outcome {
            Ok(response) => {
                tracing::debug!(method = %method, path = %path, status = %response.status, "Request handled");
                metrics::record_request(method.as_str(), "ok", start);
            }
            Err(AdapterError::RouteNotFound(message)) => {
                tracing::debug!(method = %method, path = %path, message = %message, "Route not found");
                metrics::record_request(method.as_str(), "not_found", start);
            }
            Err(e) => {
                tracing::warn!(method = %method, path = %path, error = %e, "Kernel failed to handle request");
                metrics::record_request(method.as_str(), "error", start);
            }
        }

        outcome
    }

    async fn shut_down(&self) -> Result<(), AdapterError> {
        if !self.lifecycle.advance(LifecycleState::ShuttingDown) {
            // Someone else is (or was) shutting down; wait for them.
            let mut rx = self.lifecycle.subscribe();
            let _ = rx.wait_for(|state| *state == LifecycleState::Shutdown).await;
            return Ok(());
        }

        tracing::info!("Shutting down kernel");
        let result = self.kernel.shutdown().await;
        self.lifecycle.advance(LifecycleState::Shutdown);

        match result {
            Ok(()) => {
                tracing::info!("Kernel shut down");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Kernel shutdown failed");
                Err(AdapterError::from(e))
            }
        }
    }

    fn static_folder() -> Option<&'static str> {
        Some("/public")
    }
}
