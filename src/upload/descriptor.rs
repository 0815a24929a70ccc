//! Application-level description of an uploaded file.

use std::path::{Path, PathBuf};

use crate::http::request::UploadError;

/// An uploaded file after materialization.
///
/// `path` is `None` when nothing was written: no file was sent, or the
/// transport reported an error such as the file being too large.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFileDescriptor {
    field: String,
    path: Option<PathBuf>,
    client_filename: Option<String>,
    client_media_type: Option<String>,
    error: UploadError,
    materialized: bool,
}

impl UploadedFileDescriptor {
    /// Descriptor for content written to `path`.
    pub fn stored(
        field: impl Into<String>,
        path: PathBuf,
        client_filename: Option<String>,
        client_media_type: Option<String>,
    ) -> Self {
        Self {
            field: field.into(),
            path: Some(path),
            client_filename,
            client_media_type,
            error: UploadError::Ok,
            materialized: true,
        }
    }

    /// Descriptor without content on disk.
    pub fn without_content(
        field: impl Into<String>,
        client_filename: Option<String>,
        client_media_type: Option<String>,
        error: UploadError,
    ) -> Self {
        Self {
            field: field.into(),
            path: None,
            client_filename,
            client_media_type,
            error,
            materialized: true,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Temp file holding the content.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn client_filename(&self) -> Option<&str> {
        self.client_filename.as_deref()
    }

    pub fn client_media_type(&self) -> Option<&str> {
        self.client_media_type.as_deref()
    }

    pub fn error(&self) -> UploadError {
        self.error
    }

    /// Set for every descriptor the bridge produces: the content was moved
    /// into place by the bridge, not by a direct upload, so upload-origin
    /// checks must be skipped.
    pub fn is_materialized(&self) -> bool {
        self.materialized
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_ok() && self.path.is_some()
    }
}
