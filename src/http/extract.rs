//! axum request → transport request.
//!
//! # Responsibilities
//! - Copy method, path and headers
//! - Decode query string and `Cookie` headers
//! - Decode form-urlencoded / JSON bodies into the parsed body
//! - Turn `multipart/form-data` file parts into uploaded-file entries
//!
//! # Design Decisions
//! - Non-multipart bodies are buffered up to the configured limit
//! - A file part cut off by the body limit becomes an `IniSize` entry with
//!   no content; any other mid-read failure becomes an entry with a
//!   failing stream. Remaining parts are not read in either case

use std::io;

use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart};
use axum::http::{header, HeaderMap, Request, StatusCode};
use bytes::{Bytes, BytesMut};
use futures_util::future::ready;
use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use thiserror::Error;
use url::form_urlencoded;

use crate::http::headers::HeaderBag;
use crate::http::request::{
    Params, ParsedBody, TransportRequest, UploadError, UploadedFileEntry,
};

/// Failure to turn the incoming request into a transport request.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("Malformed multipart body: {reason}")]
    Multipart { reason: String, status: StatusCode },
}

impl ExtractError {
    pub fn status(&self) -> StatusCode {
        match self {
            ExtractError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractError::Body(_) => StatusCode::BAD_REQUEST,
            ExtractError::Multipart { status, .. } => *status,
        }
    }
}

impl From<MultipartError> for ExtractError {
    fn from(e: MultipartError) -> Self {
        ExtractError::Multipart {
            reason: e.body_text(),
            status: e.status(),
        }
    }
}

pub async fn from_axum(
    request: Request<Body>,
    body_limit: usize,
) -> Result<TransportRequest, ExtractError> {
    let (parts, body) = request.into_parts();

    let mut transport = TransportRequest::new(parts.method.clone(), parts.uri.path());
    transport.headers = HeaderBag::from_http(&parts.headers);
    transport.query = parts.uri.query().map(parse_pairs).unwrap_or_default();
    transport.cookies = parse_cookies(&parts.headers);

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let request = Request::from_parts(parts, body);
        read_multipart(request, &mut transport).await?;
        return Ok(transport);
    }

    let body = read_body(body, body_limit).await?;
    transport.parsed_body = parse_body(&content_type, &body);
    transport.body = body;

    Ok(transport)
}

async fn read_multipart(
    request: Request<Body>,
    transport: &mut TransportRequest,
) -> Result<(), ExtractError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ExtractError::Multipart {
            reason: e.body_text(),
            status: e.status(),
        })?;

    let mut fields = ParsedBody::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_owned) {
            Some(filename) if filename.is_empty() => {
                transport.uploaded_files.push(UploadedFileEntry::not_sent(name));
            }
            Some(filename) => {
                let media_type = field.content_type().map(str::to_owned);
                match field.bytes().await {
                    Ok(bytes) => {
                        transport.uploaded_files.push(UploadedFileEntry::new(
                            name,
                            Some(filename),
                            media_type,
                            UploadError::Ok,
                            stream::once(ready(Ok::<_, io::Error>(bytes))).boxed(),
                        ));
                    }
                    Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                        tracing::debug!(field = %name, "Uploaded file exceeds the body limit");
                        transport.uploaded_files.push(UploadedFileEntry::new(
                            name,
                            Some(filename),
                            media_type,
                            UploadError::IniSize,
                            stream::empty().boxed(),
                        ));
                        break;
                    }
                    Err(e) => {
                        let reason = e.body_text();
                        transport.uploaded_files.push(UploadedFileEntry::new(
                            name,
                            Some(filename),
                            media_type,
                            UploadError::Partial,
                            stream::once(ready(Err::<Bytes, _>(io::Error::other(reason)))).boxed(),
                        ));
                        break;
                    }
                }
            }
            None => {
                let value = field.text().await?;
                fields.insert(name, Value::String(value));
            }
        }
    }

    transport.parsed_body = Some(fields);
    Ok(())
}

/// Buffer the body, failing once it grows past `limit`.
async fn read_body(body: Body, limit: usize) -> Result<Bytes, ExtractError> {
    let mut stream = body.into_data_stream();
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ExtractError::Body(e.to_string()))?;
        if buffer.len() + chunk.len() > limit {
            return Err(ExtractError::TooLarge { limit });
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

fn parse_pairs(raw: &str) -> Params {
    form_urlencoded::parse(raw.as_bytes()).into_owned().collect()
}

fn parse_cookies(headers: &HeaderMap) -> Params {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

fn parse_body(content_type: &str, body: &[u8]) -> Option<ParsedBody> {
    if content_type.starts_with("application/x-www-form-urlencoded") {
        Some(
            form_urlencoded::parse(body)
                .map(|(name, value)| (name.into_owned(), Value::String(value.into_owned())))
                .collect(),
        )
    } else if content_type.starts_with("application/json") {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    } else {
        None
    }
}
