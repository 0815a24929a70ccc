//! HTTP server glue binding a kernel adapter to an axum listener.
//!
//! # Responsibilities
//! - Create Axum Router with a catch-all handler and static file serving
//! - Wire up middleware (tracing, timeout, request ID, body limit)
//! - Convert axum requests and adapter outcomes
//! - Shut the adapter down once the server has stopped

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapter::KernelAdapter;
use crate::config::BridgeConfig;
use crate::error::AdapterError;
use crate::http::extract;
use crate::lifecycle::shutdown;

/// State injected into the catch-all handler.
struct AppState<A> {
    adapter: Arc<A>,
    body_limit: usize,
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            adapter: self.adapter.clone(),
            body_limit: self.body_limit,
        }
    }
}

/// HTTP server in front of a kernel adapter.
pub struct HttpServer<A: KernelAdapter> {
    router: Router,
    adapter: Arc<A>,
}

impl<A: KernelAdapter> HttpServer<A> {
    /// Create a server for `adapter`. Static files are served from the
    /// adapter's static folder under `root_path`.
    pub fn new(adapter: Arc<A>, root_path: &Path, config: &BridgeConfig) -> Self {
        let state = AppState {
            adapter: adapter.clone(),
            body_limit: config.uploads.max_body_bytes,
        };
        let router = Self::build_router(root_path, config, state);
        Self { router, adapter }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(root_path: &Path, config: &BridgeConfig, state: AppState<A>) -> Router {
        let mut router = Router::new().fallback(bridge_handler::<A>);

        if let Some(folder) = A::static_folder() {
            let dir = root_path.join(folder.trim_start_matches('/'));
            tracing::debug!(folder = %folder, dir = %dir.display(), "Serving static files");
            router = router.nest_service(folder, ServeDir::new(dir));
        }

        router
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.uploads.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.listener.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The configured router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    /// Serve until `shutdown` fires, then shut the adapter down.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");

        if let Err(e) = self.adapter.shut_down().await {
            tracing::error!(error = %e, "Adapter shutdown failed");
        }
        Ok(())
    }
}

/// Catch-all handler: transport request in, adapter outcome out.
async fn bridge_handler<A: KernelAdapter>(
    State(state): State<AppState<A>>,
    request: Request<Body>,
) -> Response {
    let transport = match extract::from_axum(request, state.body_limit).await {
        Ok(transport) => transport,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting unreadable request");
            return (e.status(), e.to_string()).into_response();
        }
    };

    match state.adapter.handle(transport).await {
        Ok(response) => response.into_response(),
        Err(AdapterError::RouteNotFound(message)) => {
            (StatusCode::NOT_FOUND, message).into_response()
        }
        Err(AdapterError::NotReady(lifecycle)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Server is {}", lifecycle),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
