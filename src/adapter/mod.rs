//! Kernel adapters.
//!
//! # Data Flow
//! ```text
//! create():  KernelFactory → capability check → boot → preload → subscribe → Ready
//!
//! handle():  TransportRequest
//!     → translate.rs (materialize uploads → build request)
//!     → Kernel::handle_async
//!     → error translation (RouteNotFound) / response translation
//!     → reaper launched, response returned without waiting for it
//! ```
//!
//! # Design Decisions
//! - `KernelAdapter` is the capability set a transport needs; concrete
//!   bridges implement it without any shared base state
//! - Watch metadata is static per adapter type (`ObservableKernel`)

pub mod bridge;
pub mod translate;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;

use crate::config::ServerContext;
use crate::error::AdapterError;
use crate::http::{TransportRequest, TransportResponse};
use crate::kernel::OutputSink;
use crate::upload::{MimeTypeChecker, TempStorage};

pub use bridge::KernelBridge;
pub use translate::{build_request, RequestTranslator};

/// Watch configuration consumed by an external file watcher.
pub trait ObservableKernel {
    /// Directory names to watch, relative to the root path.
    fn observable_folders() -> &'static [&'static str];

    /// File extensions (without dot) whose changes matter.
    fn observable_extensions() -> &'static [&'static str];

    /// Directory names never to watch.
    fn ignorable_folders() -> &'static [&'static str] {
        &[]
    }
}

/// Bridge between an async transport and an application kernel.
#[async_trait]
pub trait KernelAdapter: ObservableKernel + Send + Sync + Sized + 'static {
    /// Build a ready adapter. Resolves only after the kernel is booted,
    /// preloaded and subscribed.
    async fn create(
        event_loop: Handle,
        root_path: PathBuf,
        context: ServerContext,
        output: Arc<dyn OutputSink>,
        mime: Arc<dyn MimeTypeChecker>,
        storage: Arc<dyn TempStorage>,
    ) -> Result<Self, AdapterError>;

    async fn handle(&self, request: TransportRequest) -> Result<TransportResponse, AdapterError>;

    async fn shut_down(&self) -> Result<(), AdapterError>;

    /// Static-asset directory, relative to the root path (leading `/`).
    fn static_folder() -> Option<&'static str>;
}
