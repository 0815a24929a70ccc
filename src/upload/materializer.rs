//! Writes uploaded file content to temporary storage.
//!
//! # Responsibilities
//! - Short-circuit "no file sent" entries without any I/O
//! - Read each entry's byte stream and write it under a fresh temp name
//! - Join all entries of a request and drop the ones that could not be read
//! - Track every temp path before writing it, so the request's reap guard
//!   removes partial and abandoned writes

use std::path::PathBuf;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures_util::future::join_all;
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::http::request::{UploadError, UploadStream, UploadedFileEntry};
use crate::observability::metrics;
use crate::upload::descriptor::UploadedFileDescriptor;
use crate::upload::mime::MimeTypeChecker;
use crate::upload::reaper::PathTracker;
use crate::upload::storage::TempStorage;

/// Outcome of materializing one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    File(UploadedFileDescriptor),
    /// The entry's stream could not be read; the file is left out.
    Absent,
}

impl Materialized {
    pub fn into_descriptor(self) -> Option<UploadedFileDescriptor> {
        match self {
            Materialized::File(descriptor) => Some(descriptor),
            Materialized::Absent => None,
        }
    }
}

/// Turns transport upload entries into descriptors backed by temp files.
#[derive(Clone)]
pub struct UploadMaterializer {
    storage: Arc<dyn TempStorage>,
    mime: Arc<dyn MimeTypeChecker>,
}

impl UploadMaterializer {
    pub fn new(storage: Arc<dyn TempStorage>, mime: Arc<dyn MimeTypeChecker>) -> Self {
        Self { storage, mime }
    }

    /// Materialize every entry concurrently; resolves once all are done.
    pub async fn materialize_all(
        &self,
        entries: Vec<UploadedFileEntry>,
        tracker: &PathTracker,
    ) -> Vec<UploadedFileDescriptor> {
        join_all(entries.into_iter().map(|entry| self.materialize(entry, tracker)))
            .await
            .into_iter()
            .filter_map(Materialized::into_descriptor)
            .collect()
    }

    /// Materialize one entry. Any path written to is recorded in `tracker`
    /// first, even if the write then fails.
    pub async fn materialize(&self, entry: UploadedFileEntry, tracker: &PathTracker) -> Materialized {
        let UploadedFileEntry {
            field,
            client_filename,
            client_media_type,
            error,
            stream,
        } = entry;

        if error == UploadError::NoFile {
            metrics::record_upload("not_sent");
            return Materialized::File(UploadedFileDescriptor::without_content(
                field,
                client_filename,
                client_media_type,
                error,
            ));
        }

        let path = self.temp_path(client_filename.as_deref());

        let contents = match read_stream(stream).await {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    field = %field,
                    filename = ?client_filename,
                    error = %e,
                    "Dropping uploaded file with unreadable stream"
                );
                metrics::record_upload("unreadable");
                return Materialized::Absent;
            }
        };

        if !error.is_ok() {
            metrics::record_upload("rejected");
            return Materialized::File(UploadedFileDescriptor::without_content(
                field,
                client_filename,
                client_media_type,
                error,
            ));
        }

        let size = contents.len();
        tracker.track(&path);
        if let Err(e) = self.storage.write(&path, contents).await {
            tracing::error!(path = %path.display(), error = %e, "Failed to write uploaded file");
            metrics::record_upload("write_failed");
            return Materialized::File(UploadedFileDescriptor::without_content(
                field,
                client_filename,
                client_media_type,
                UploadError::CantWrite,
            ));
        }

        tracing::debug!(field = %field, path = %path.display(), bytes = size, "Uploaded file materialized");
        metrics::record_upload("stored");
        Materialized::File(UploadedFileDescriptor::stored(
            field,
            path,
            client_filename,
            client_media_type,
        ))
    }

    fn temp_path(&self, client_filename: Option<&str>) -> PathBuf {
        let stem = Uuid::new_v4().simple().to_string();
        let name = match client_filename.and_then(|name| self.mime.extension_for(name)) {
            Some(extension) => format!("{}.{}", stem, extension),
            None => stem,
        };
        self.storage.temp_dir().join(name)
    }
}

async fn read_stream(stream: UploadStream) -> std::io::Result<Bytes> {
    let buffer = stream
        .try_fold(BytesMut::new(), |mut buffer, chunk| async move {
            buffer.extend_from_slice(&chunk);
            Ok(buffer)
        })
        .await?;
    Ok(buffer.freeze())
}
