//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (adapter::bridge create):
//!     Construct kernel → capability check → Boot → register event loop
//!     → Preload → subscribe exchanges → Ready
//!
//! Shutdown (shutdown.rs + adapter::bridge shut_down):
//!     Owner triggers Shutdown → server stops accepting → kernel shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: any failing stage aborts creation
//! - State lives in a watch channel so the transport can observe it
//! - No shutdown timeout here; forced stop belongs to the process supervisor

pub mod shutdown;
pub mod state;

pub use shutdown::Shutdown;
pub use state::{Lifecycle, LifecycleState};
