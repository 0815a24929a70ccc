//! Upload materialization subsystem.
//!
//! # Data Flow
//! ```text
//! UploadedFileEntry (transport, byte stream)
//!     → materializer.rs (read stream, write temp file)
//!     → UploadedFileDescriptor (attached to the ApplicationRequest)
//!     → kernel handles request
//!     → reaper.rs (spawned deletes, never awaited by the response path)
//! ```
//!
//! # Design Decisions
//! - All entries of one request are materialized concurrently and joined
//!   before the application request is built
//! - An unreadable stream drops the file silently
//! - A descriptor only carries a temp path when bytes were written to it

pub mod descriptor;
pub mod materializer;
pub mod mime;
pub mod reaper;
pub mod storage;

pub use descriptor::UploadedFileDescriptor;
pub use materializer::{Materialized, UploadMaterializer};
pub use mime::{ExtensionMap, MimeTypeChecker};
pub use reaper::{PathTracker, ReapGuard, TempFileReaper};
pub use storage::{LocalFilesystem, TempStorage};
