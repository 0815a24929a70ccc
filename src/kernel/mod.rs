//! Application kernel contract.
//!
//! # Data Flow
//! ```text
//! KernelFactory::build(environment, debug)
//!     → Box<dyn Kernel>
//!     → into_preloadable()        (capability check)
//!     → boot() + container registration
//!     → preload()
//!     → handle_async(ApplicationRequest) per request
//!     → shutdown()
//! ```
//!
//! # Design Decisions
//! - Async preloading is a separate trait; a kernel opts in by returning
//!   itself from `into_preloadable`
//! - The kernel is shared behind an `Arc` and must accept overlapping
//!   `handle_async` calls
//! - Services (event loop, event bus subscriber) live in a type-keyed
//!   container owned by the kernel

pub mod container;
pub mod error;
pub mod events;
pub mod request;
pub mod response;

use async_trait::async_trait;

pub use container::{EventLoop, ServiceContainer};
pub use error::KernelError;
pub use events::{EventBusSubscriber, OutputSink, TracingOutput};
pub use request::ApplicationRequest;
pub use response::ApplicationResponse;

/// A request-processing kernel.
#[async_trait]
pub trait Kernel: Send + Sync {
    fn environment(&self) -> &str;

    fn is_debug(&self) -> bool;

    /// Synchronous boot; called once before any service registration.
    fn boot(&mut self) -> Result<(), KernelError>;

    fn container(&self) -> &ServiceContainer;

    fn container_mut(&mut self) -> &mut ServiceContainer;

    async fn handle_async(
        &self,
        request: ApplicationRequest,
    ) -> Result<ApplicationResponse, KernelError>;

    async fn shutdown(&self) -> Result<(), KernelError>;

    /// Capability query for async preloading. Kernels that support it
    /// return `Some(self)`.
    fn into_preloadable(self: Box<Self>) -> Option<Box<dyn PreloadableKernel>> {
        None
    }
}

/// A kernel that can warm itself up asynchronously after boot.
#[async_trait]
pub trait PreloadableKernel: Kernel {
    async fn preload(&self) -> Result<(), KernelError>;
}

/// Builds a kernel for an environment/debug pair.
pub trait KernelFactory: Send + Sync + 'static {
    fn build(&self, environment: &str, debug: bool) -> Box<dyn Kernel>;
}
