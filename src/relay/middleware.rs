use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use super::{json_error, RelayState};
use crate::telemetry::{self, RequestSpan};

const ALLOW_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Route family used as a low-cardinality metric label.
fn route_label(path: &str) -> &'static str {
    if path == "/health" {
        "health"
    } else if path.starts_with("/audio/") {
        "audio"
    } else if path == "/api" || path.starts_with("/api/") {
        "api"
    } else {
        "other"
    }
}

/// Reuse a sane caller-supplied id, otherwise mint one.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

pub(super) async fn request_tracing_middleware(
    State(state): State<RelayState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let route = route_label(&path);
    let request_id = request_id(request.headers());
    let span = RequestSpan::relay(&request_id, &method, &path);
    let started = tokio::time::Instant::now();

    let mut response = match state.shutdown.track() {
        Some(_guard) => next.run(request).instrument(span.clone()).await,
        None => json_error(StatusCode::SERVICE_UNAVAILABLE, "Server is shutting down"),
    };

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;
    span.record("status_code", status);
    span.record("latency_ms", latency_ms);
    telemetry::record_relay_request(route, status, latency_ms);
    span.in_scope(|| tracing::debug!(status, latency_ms, "relay request complete"));

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Any origin, any listed method; preflights answer 204 and echo the
/// requested headers.
pub(super) async fn cors_middleware(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        let headers = resp.headers_mut();
        headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
        headers.insert(
            "access-control-allow-methods",
            HeaderValue::from_static(ALLOW_METHODS),
        );
        if let Some(requested) = request.headers().get("access-control-request-headers") {
            headers.insert("access-control-allow-headers", requested.clone());
            headers.insert("vary", HeaderValue::from_static("Access-Control-Request-Headers"));
        }
        return resp;
    }

    let mut resp = next.run(request).await;
    resp.headers_mut()
        .insert("access-control-allow-origin", HeaderValue::from_static("*"));
    resp
}
