//! Transport-level request shape.
//!
//! # Responsibilities
//! - Hold what the transport layer parsed off the wire: method, path,
//!   headers, query, cookies, body, attributes and uploaded-file entries
//! - Carry upload byte content as a stream so the bridge decides when
//!   (and whether) to read it
//!
//! # Design Decisions
//! - Body bytes are `Bytes` so the raw body can be shared with the
//!   application request without copying
//! - Uploaded-file entries are flattened; each carries its form field name

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use axum::http::Method;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, StreamExt};

use crate::http::headers::HeaderBag;

/// Flat string parameters (query string, cookies, server variables).
pub type Params = BTreeMap<String, String>;

/// Structured body as decoded by the transport (form fields or a JSON object).
pub type ParsedBody = serde_json::Map<String, serde_json::Value>;

/// Byte stream of one uploaded file.
pub type UploadStream = BoxStream<'static, io::Result<Bytes>>;

/// A request attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Value(serde_json::Value),
    /// Raw request body, re-readable independently of the buffered copy.
    Body(Bytes),
}

/// Request attributes keyed by name.
pub type Attributes = BTreeMap<String, Attribute>;

/// Upload status codes, numbered like the classic multipart upload errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadError {
    Ok,
    IniSize,
    FormSize,
    Partial,
    NoFile,
    NoTmpDir,
    CantWrite,
    Extension,
}

impl UploadError {
    pub fn code(self) -> u8 {
        match self {
            UploadError::Ok => 0,
            UploadError::IniSize => 1,
            UploadError::FormSize => 2,
            UploadError::Partial => 3,
            UploadError::NoFile => 4,
            UploadError::NoTmpDir => 6,
            UploadError::CantWrite => 7,
            UploadError::Extension => 8,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(UploadError::Ok),
            1 => Some(UploadError::IniSize),
            2 => Some(UploadError::FormSize),
            3 => Some(UploadError::Partial),
            4 => Some(UploadError::NoFile),
            6 => Some(UploadError::NoTmpDir),
            7 => Some(UploadError::CantWrite),
            8 => Some(UploadError::Extension),
            _ => None,
        }
    }

    pub fn is_ok(self) -> bool {
        self == UploadError::Ok
    }
}

/// One uploaded file as delivered by the transport.
pub struct UploadedFileEntry {
    /// Form field the file was sent under.
    pub field: String,
    pub client_filename: Option<String>,
    pub client_media_type: Option<String>,
    pub error: UploadError,
    pub stream: UploadStream,
}

impl UploadedFileEntry {
    pub fn new(
        field: impl Into<String>,
        client_filename: Option<String>,
        client_media_type: Option<String>,
        error: UploadError,
        stream: UploadStream,
    ) -> Self {
        Self {
            field: field.into(),
            client_filename,
            client_media_type,
            error,
            stream,
        }
    }

    /// A successfully received file whose content is already in memory.
    pub fn from_bytes(
        field: impl Into<String>,
        filename: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        let content = content.into();
        Self::new(
            field,
            Some(filename.into()),
            Some(media_type.into()),
            UploadError::Ok,
            stream::once(async move { Ok::<_, io::Error>(content) }).boxed(),
        )
    }

    /// A file input that was submitted empty.
    pub fn not_sent(field: impl Into<String>) -> Self {
        Self::new(
            field,
            None,
            None,
            UploadError::NoFile,
            stream::empty().boxed(),
        )
    }

    /// An entry whose stream fails on first read.
    pub fn unreadable(field: impl Into<String>, filename: impl Into<String>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(
            field,
            Some(filename.into()),
            None,
            UploadError::Ok,
            stream::once(async move { Err::<Bytes, _>(io::Error::other(reason)) }).boxed(),
        )
    }
}

impl fmt::Debug for UploadedFileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFileEntry")
            .field("field", &self.field)
            .field("client_filename", &self.client_filename)
            .field("client_media_type", &self.client_media_type)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// A request as handed over by the transport layer.
#[derive(Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderBag,
    pub query: Params,
    /// `None` when the transport did not decode the body.
    pub parsed_body: Option<ParsedBody>,
    pub body: Bytes,
    pub cookies: Params,
    pub attributes: Attributes,
    pub uploaded_files: Vec<UploadedFileEntry>,
}

impl TransportRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderBag::new(),
            query: Params::new(),
            parsed_body: None,
            body: Bytes::new(),
            cookies: Params::new(),
            attributes: Attributes::new(),
            uploaded_files: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_parsed_body(mut self, parsed: ParsedBody) -> Self {
        self.parsed_body = Some(parsed);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Attribute) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_upload(mut self, entry: UploadedFileEntry) -> Self {
        self.uploaded_files.push(entry);
        self
    }

    /// Split off the uploaded-file entries, leaving the rest of the request.
    pub fn take_uploads(&mut self) -> Vec<UploadedFileEntry> {
        std::mem::take(&mut self.uploaded_files)
    }
}
