//! Transparent `/api` forwarding.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::Response;

use super::{json_error, RelayState};
use crate::telemetry;

/// Connection-scoped headers that must not cross the relay.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Request headers minus hop-by-hop, `Host` (the client sets it for the
/// backend origin) and `Content-Length` (the body is re-sent buffered).
fn upstream_request_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name) || name == "host" || name == "content-length" {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

fn downstream_response_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_hop_by_hop(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

pub(super) async fn forward_handler(State(state): State<RelayState>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/api");

    let target = match state.backend.join(path_and_query) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(path = %path_and_query, error = %e, "unroutable api path");
            return json_error(StatusCode::BAD_REQUEST, "Invalid request path");
        }
    };

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(limit = state.max_body_bytes, error = %e, "request body rejected");
            return json_error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }
    };

    let started = tokio::time::Instant::now();
    let upstream = state
        .client
        .request(parts.method.clone(), target.clone())
        .headers(upstream_request_headers(&parts.headers))
        .body(body)
        .send()
        .await;

    match upstream {
        Ok(resp) => {
            tracing::debug!(
                upstream = %target,
                status = resp.status().as_u16(),
                upstream_ms = started.elapsed().as_millis() as u64,
                "api request forwarded"
            );
            let status = resp.status();
            let headers = downstream_response_headers(resp.headers());
            let mut response = Response::new(Body::from_stream(resp.bytes_stream()));
            *response.status_mut() = status;
            *response.headers_mut() = headers;
            response
        }
        Err(e) => {
            telemetry::record_relay_upstream_failure("api");
            tracing::error!(
                upstream = %target,
                error = %e,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "backend unreachable"
            );
            json_error(StatusCode::BAD_GATEWAY, "Failed to reach backend service")
        }
    }
}
