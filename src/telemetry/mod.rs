//! Telemetry: structured logging, request spans and metrics.

mod logging;
mod metrics;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use self::metrics::{
    record_cache_hit, record_cache_miss, record_relay_request, record_relay_upstream_failure,
    record_simplify_outcome,
};
pub use spans::{ErrorKind, RequestSpan, SpanExt};
