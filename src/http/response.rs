//! Transport-level response and the response translation.
//!
//! # Design Decisions
//! - Translation from the application response is a structural copy:
//!   status, headers and body bytes, nothing else
//! - Header names/values the `http` crate rejects are dropped when the
//!   response is written out, with a warning

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::http::headers::HeaderBag;
use crate::kernel::ApplicationResponse;

/// A response ready to be written by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderBag,
    pub body: Bytes,
}

impl From<ApplicationResponse> for TransportResponse {
    fn from(response: ApplicationResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            body: response.content,
        }
    }
}

impl IntoResponse for TransportResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        for (name, values) in self.headers.iter() {
            let Ok(header_name) = HeaderName::try_from(name) else {
                tracing::warn!(header = %name, "Dropping invalid response header name");
                continue;
            };
            for value in values {
                match HeaderValue::try_from(value.as_str()) {
                    Ok(value) => {
                        response.headers_mut().append(header_name.clone(), value);
                    }
                    Err(_) => {
                        tracing::warn!(header = %name, "Dropping invalid response header value");
                    }
                }
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_copies_everything() {
        let app = ApplicationResponse::new(StatusCode::CREATED)
            .with_header("Location", "/items/7")
            .with_header("Set-Cookie", "a=1")
            .with_header("Set-Cookie", "b=2")
            .with_content("created");

        let transport = TransportResponse::from(app.clone());
        assert_eq!(transport.status, StatusCode::CREATED);
        assert_eq!(transport.headers, app.headers);
        assert_eq!(transport.body, Bytes::from_static(b"created"));
    }

    #[test]
    fn test_into_response_keeps_multi_values() {
        let transport = TransportResponse::from(
            ApplicationResponse::new(StatusCode::OK)
                .with_header("Set-Cookie", "a=1")
                .with_header("Set-Cookie", "b=2")
                .with_header("Bad Header", "x"),
        );

        let response = transport.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get_all("set-cookie").iter().count(), 2);
        assert_eq!(response.headers().len(), 2);
    }
}
