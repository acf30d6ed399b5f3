//! Audio file relay.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;

use super::{json_error, RelayState};
use crate::telemetry;

const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Why an audio fetch could not be relayed.
#[derive(Debug, thiserror::Error)]
enum AudioFetchError {
    #[error("backend URL cannot carry a path")]
    BadBase,
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend answered {0}")]
    Status(StatusCode),
}

async fn fetch(state: &RelayState, filename: &str) -> Result<reqwest::Response, AudioFetchError> {
    let mut url = state.backend.clone();
    url.path_segments_mut()
        .map_err(|()| AudioFetchError::BadBase)?
        .pop_if_empty()
        .extend(["audio", filename]);

    let resp = state.client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(AudioFetchError::Status(resp.status()));
    }
    Ok(resp)
}

/// `GET /audio/:filename`: the backend's bytes, always labelled `audio/mpeg`.
pub(super) async fn audio_handler(
    State(state): State<RelayState>,
    Path(filename): Path<String>,
) -> Response {
    match fetch(&state, &filename).await {
        Ok(resp) => {
            let mut response = Response::new(Body::from_stream(resp.bytes_stream()));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(AUDIO_CONTENT_TYPE),
            );
            response
        }
        Err(e) => {
            telemetry::record_relay_upstream_failure("audio");
            tracing::error!(filename = %filename, error = %e, "error proxying audio");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve audio file",
            )
        }
    }
}
