//! HTTP relay in front of the simplify/TTS backend.
//!
//! Three route families: `/health` (answered locally), `/audio/:filename`
//! (streamed from the backend as `audio/mpeg`) and `/api` + `/api/*`
//! (forwarded verbatim). Every route gets permissive CORS and a request id.

mod audio;
mod middleware;
mod proxy;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use reqwest::Url;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::health::HealthReport;
use crate::shutdown::ShutdownCoordinator;

pub use proxy::HOP_BY_HOP_HEADERS;

/// Default relay listen address.
pub const DEFAULT_RELAY_ADDR: &str = "0.0.0.0:3001";
/// Default backend origin.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
/// Default cap on buffered request bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("HTTP client init failed: {0}")]
    Client(String),

    #[error("Relay server failed: {0}")]
    Serve(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub backend_url: String,
    pub max_body_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Shared handler state. Cheap to clone.
#[derive(Clone, Debug)]
pub struct RelayState {
    client: reqwest::Client,
    backend: Url,
    max_body_bytes: usize,
    shutdown: Arc<ShutdownCoordinator>,
}

impl RelayState {
    pub fn new(
        config: &RelayConfig,
        shutdown: Arc<ShutdownCoordinator>,
    ) -> Result<Self, RelayError> {
        let backend = Url::parse(&config.backend_url).map_err(|e| RelayError::InvalidBackendUrl {
            url: config.backend_url.clone(),
            reason: e.to_string(),
        })?;
        if backend.cannot_be_a_base() {
            return Err(RelayError::InvalidBackendUrl {
                url: config.backend_url.clone(),
                reason: "not a base URL".to_string(),
            });
        }
        // Redirects are the client's business, not the relay's.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| RelayError::Client(e.to_string()))?;
        Ok(Self {
            client,
            backend,
            max_body_bytes: config.max_body_bytes,
            shutdown,
        })
    }

    pub fn backend(&self) -> &Url {
        &self.backend
    }
}

pub fn build_router(state: RelayState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/audio/:filename", get(audio::audio_handler))
        .route("/api", any(proxy::forward_handler))
        .route("/api/*path", any(proxy::forward_handler))
        .layer(from_fn(middleware::cors_middleware))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing_middleware,
        ))
        .with_state(state)
}

/// Serve until `shutdown` is cancelled, then finish open connections.
pub async fn serve(
    listener: TcpListener,
    state: RelayState,
    shutdown: CancellationToken,
) -> Result<(), RelayError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, backend = %state.backend, "relay listening");
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    tracing::info!("relay stopped");
    Ok(())
}

async fn health_handler() -> Json<HealthReport> {
    Json(HealthReport::relay())
}

/// `{"error": message}` with the given status.
pub(crate) fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
