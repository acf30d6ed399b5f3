//! Span utilities and extension traits.
//!
//! Provides standardized span creation and result recording.

use tracing::{info_span, Span};

use crate::simplify::SimplifyError;

/// Errors that carry a stable classification label.
pub trait ErrorKind {
    fn error_kind(&self) -> &'static str;
}

impl ErrorKind for SimplifyError {
    fn error_kind(&self) -> &'static str {
        self.kind()
    }
}

/// Extension trait for adding context to spans.
pub trait SpanExt {
    /// Record the result of an operation into the span.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display + ErrorKind;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display + ErrorKind,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.kind", e.error_kind());
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for creating standardized request spans.
pub struct RequestSpan;

impl RequestSpan {
    /// Span for one uncached simplify/speak backend call.
    ///
    /// `status`, `error.kind`, `error.message` and `latency_ms` are filled in
    /// after completion.
    pub fn simplify(request_id: &str, language: &str) -> Span {
        info_span!(
            "simplify_request",
            request_id = %request_id,
            language = %language,
            status = tracing::field::Empty,
            error.kind = tracing::field::Empty,
            error.message = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        )
    }

    /// Span for one relayed HTTP request.
    pub fn relay(request_id: &str, method: &str, route: &str) -> Span {
        info_span!(
            "relay_request",
            request_id = %request_id,
            method = %method,
            route = %route,
            status_code = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        )
    }
}
