//! Kernel-facing response value.

use axum::http::StatusCode;
use bytes::Bytes;

use crate::http::headers::HeaderBag;

/// Response produced by a kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationResponse {
    pub status: StatusCode,
    pub headers: HeaderBag,
    pub content: Bytes,
}

impl ApplicationResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderBag::new(),
            content: Bytes::new(),
        }
    }

    pub fn ok(content: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK).with_content(content)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = content.into();
        self
    }
}
