//! Async transport bridge for request/response application kernels.

pub mod adapter;
pub mod config;
pub mod error;
pub mod http;
pub mod kernel;
pub mod lifecycle;
pub mod observability;
pub mod upload;

pub use adapter::{KernelAdapter, KernelBridge, ObservableKernel};
pub use config::schema::BridgeConfig;
pub use config::ServerContext;
pub use error::AdapterError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
