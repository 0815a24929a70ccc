//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!
//! Consumers:
//!     → Log aggregation (stdout via tracing-subscriber)
//!     → Whatever metrics recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Request method and outcome are the only request labels
//! - No recorder is installed here; without one, metric calls are no-ops

pub mod logging;
pub mod metrics;
