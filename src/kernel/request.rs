//! Kernel-facing request value.
//!
//! Built once per inbound request by the request translator and moved into
//! the kernel; it exposes read accessors only.

use axum::http::Method;
use bytes::Bytes;

use crate::http::headers::HeaderBag;
use crate::http::request::{Attribute, Attributes, Params, ParsedBody};
use crate::upload::UploadedFileDescriptor;

/// Attribute under which the raw request body is attached.
pub const BODY_ATTRIBUTE: &str = "body";

/// Server variable holding the resolved request path.
pub const REQUEST_URI: &str = "REQUEST_URI";

/// Server variable holding the host name taken from the `Host` header.
pub const SERVER_NAME: &str = "SERVER_NAME";

/// A fully materialized request.
#[derive(Debug, Clone)]
pub struct ApplicationRequest {
    pub(crate) method: Method,
    pub(crate) query: Params,
    pub(crate) parsed_body: ParsedBody,
    pub(crate) content: Bytes,
    pub(crate) attributes: Attributes,
    pub(crate) cookies: Params,
    pub(crate) files: Vec<UploadedFileDescriptor>,
    pub(crate) headers: HeaderBag,
    pub(crate) server: Params,
}

impl ApplicationRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Resolved request path (`REQUEST_URI`).
    pub fn path(&self) -> &str {
        self.server.get(REQUEST_URI).map(String::as_str).unwrap_or("/")
    }

    pub fn query(&self) -> &Params {
        &self.query
    }

    /// Decoded body; empty for streamed bodies.
    pub fn parsed_body(&self) -> &ParsedBody {
        &self.parsed_body
    }

    /// Buffered body; empty for streamed bodies.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// The raw body stream as received, regardless of buffering.
    pub fn raw_body(&self) -> Option<&Bytes> {
        match self.attributes.get(BODY_ATTRIBUTE) {
            Some(Attribute::Body(body)) => Some(body),
            _ => None,
        }
    }

    pub fn cookies(&self) -> &Params {
        &self.cookies
    }

    pub fn files(&self) -> &[UploadedFileDescriptor] {
        &self.files
    }

    /// First uploaded file sent under `field`.
    pub fn file(&self, field: &str) -> Option<&UploadedFileDescriptor> {
        self.files.iter().find(|file| file.field() == field)
    }

    pub fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    /// Server variables.
    pub fn server(&self) -> &Params {
        &self.server
    }

    pub fn server_name(&self) -> Option<&str> {
        self.server.get(SERVER_NAME).map(String::as_str)
    }
}
