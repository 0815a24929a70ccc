//! Transport request → application request.
//!
//! # Responsibilities
//! - Resolve the upload set (or skip it when uploads are disabled)
//! - Leave body fields empty for `Transfer-Encoding` requests
//! - Drop cookies when cookies are disabled
//! - Derive `REQUEST_URI` and `SERVER_NAME`, attach the raw body attribute
//!
//! # Design Decisions
//! - `build_request` is pure; the only suspension point is the upload join
//! - Server variables come from the context, never from the process

use std::sync::Arc;

use bytes::Bytes;

use crate::config::ServerContext;
use crate::http::request::{Attribute, Params, ParsedBody, TransportRequest};
use crate::kernel::request::{ApplicationRequest, BODY_ATTRIBUTE, REQUEST_URI, SERVER_NAME};
use crate::upload::{PathTracker, UploadMaterializer, UploadedFileDescriptor};

const TRANSFER_ENCODING: &str = "Transfer-Encoding";
const HOST: &str = "Host";

/// Builds application requests for one bridge.
#[derive(Clone)]
pub struct RequestTranslator {
    context: Arc<ServerContext>,
    materializer: UploadMaterializer,
}

impl RequestTranslator {
    pub fn new(context: Arc<ServerContext>, materializer: UploadMaterializer) -> Self {
        Self {
            context,
            materializer,
        }
    }

    /// Materialize uploads, then build the request. Resolves only after
    /// every upload write has completed; written paths land in `tracker`.
    pub async fn translate(
        &self,
        mut request: TransportRequest,
        tracker: &PathTracker,
    ) -> ApplicationRequest {
        let entries = request.take_uploads();
        let files = if self.context.uploads_disabled() || entries.is_empty() {
            Vec::new()
        } else {
            self.materializer.materialize_all(entries, tracker).await
        };

        build_request(request, files, &self.context)
    }
}

/// Assemble the application request from already materialized files.
pub fn build_request(
    request: TransportRequest,
    files: Vec<UploadedFileDescriptor>,
    context: &ServerContext,
) -> ApplicationRequest {
    let TransportRequest {
        method,
        path,
        headers,
        query,
        parsed_body,
        body,
        cookies,
        mut attributes,
        uploaded_files: _,
    } = request;

    let (parsed_body, content) = if headers.contains(TRANSFER_ENCODING) {
        (ParsedBody::new(), Bytes::new())
    } else {
        (parsed_body.unwrap_or_default(), body.clone())
    };

    let cookies = if context.cookies_disabled() {
        Params::new()
    } else {
        cookies
    };

    let mut server = context.server_params().clone();
    server.insert(REQUEST_URI.to_string(), path);
    if let Some(host) = headers.first(HOST) {
        server.insert(SERVER_NAME.to_string(), server_name(host).to_string());
    }

    attributes.insert(BODY_ATTRIBUTE.to_string(), Attribute::Body(body));

    ApplicationRequest {
        method,
        query,
        parsed_body,
        content,
        attributes,
        cookies,
        files,
        headers,
        server,
    }
}

/// Host part of a `Host` header value (port stripped, IPv6 brackets kept).
pub fn server_name(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return &host[..end + 2];
        }
    }
    host.split(':').next().unwrap_or(host)
}
