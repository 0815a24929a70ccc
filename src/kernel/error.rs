//! Kernel-side failures.

use thiserror::Error;

/// Errors raised by a kernel while booting, handling or shutting down.
#[derive(Debug, Error)]
pub enum KernelError {
    /// No route matched the request.
    #[error("{0}")]
    RouteNotFound(String),

    #[error("Kernel boot failed: {0}")]
    Boot(String),

    #[error("Kernel preload failed: {0}")]
    Preload(String),

    #[error("Exchange subscription failed: {0}")]
    Subscription(String),

    #[error("Kernel shutdown failed: {0}")]
    Shutdown(String),

    /// Anything raised by application code.
    #[error(transparent)]
    Application(Box<dyn std::error::Error + Send + Sync>),
}

impl KernelError {
    pub fn application(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        KernelError::Application(error.into())
    }
}

/// Result type for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;
