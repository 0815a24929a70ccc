//! HTTP transport side of the bridge.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, static files)
//!     → extract.rs (axum request → TransportRequest)
//!     → [kernel adapter]
//!     → response.rs (ApplicationResponse → TransportResponse → axum)
//!     → Send to client
//! ```

pub mod extract;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use extract::ExtractError;
pub use headers::HeaderBag;
pub use request::{
    Attribute, Attributes, Params, ParsedBody, TransportRequest, UploadError, UploadStream,
    UploadedFileEntry,
};
pub use response::TransportResponse;
pub use server::HttpServer;
