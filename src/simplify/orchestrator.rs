//! Simplify/speak request orchestration.
//!
//! One call: cache lookup, then a single backend attempt raced against the
//! hard deadline, the caller's cancel token and the fire-once progress timer.
//! Only successful results are memoized.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::backend::SimplifyBackend;
use super::cache::SimplifyCache;
use super::coalesce::InflightGate;
use super::error::SimplifyError;
use super::progress::{ProgressSink, ProgressTimer};
use super::types::{Language, SimplifyRequest, SimplifyResult};
use crate::telemetry::{self, RequestSpan, SpanExt};

/// Hard deadline for one backend call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Elapsed time after which a "still processing" signal is emitted.
pub const DEFAULT_PROGRESS_AFTER: Duration = Duration::from_secs(10);

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Prefix for audio URLs. Empty yields relative paths.
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub progress_after: Duration,
    /// Share one backend call between concurrent identical requests.
    pub coalesce_inflight: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            progress_after: DEFAULT_PROGRESS_AFTER,
            coalesce_inflight: false,
        }
    }
}

/// Caller-owned orchestrator. Construct once per process (or per test).
pub struct Orchestrator {
    backend: Arc<dyn SimplifyBackend>,
    cache: SimplifyCache,
    inflight: Option<InflightGate>,
    progress: Option<Arc<dyn ProgressSink>>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn SimplifyBackend>, config: OrchestratorConfig) -> Self {
        let inflight = config.coalesce_inflight.then(InflightGate::new);
        Self {
            backend,
            cache: SimplifyCache::new(),
            inflight,
            progress: None,
            config,
        }
    }

    /// Route progress events to `sink`.
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Simplify, translate and synthesize `text`, reusing a cached result when present.
    pub async fn simplify_and_speak(
        &self,
        text: &str,
        language: Language,
    ) -> Result<Arc<SimplifyResult>, SimplifyError> {
        self.simplify_and_speak_cancellable(text, language, CancellationToken::new())
            .await
    }

    /// Same as [`simplify_and_speak`](Self::simplify_and_speak); cancelling
    /// `cancel` aborts the call (or the wait behind an identical one) with
    /// [`SimplifyError::Cancelled`].
    pub async fn simplify_and_speak_cancellable(
        &self,
        text: &str,
        language: Language,
        cancel: CancellationToken,
    ) -> Result<Arc<SimplifyResult>, SimplifyError> {
        let request = SimplifyRequest::new(text, language)?;
        let key = request.cache_key();

        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(language = %request.language(), "using cached simplify result");
            telemetry::record_cache_hit(request.language().code());
            return Ok(hit);
        }

        // One deadline for the whole call, including any wait at the gate.
        let started = Instant::now();
        let deadline = started + self.config.request_timeout;
        let mut progress = ProgressTimer::arm(self.config.progress_after, self.progress.clone());

        let _slot = match &self.inflight {
            Some(gate) => {
                let waited = tokio::select! {
                    biased;
                    () = cancel.cancelled() => Err(SimplifyError::Cancelled),
                    () = sleep_until(deadline) => Err(SimplifyError::Timeout(self.config.request_timeout)),
                    guard = gate.acquire(&key) => Ok(guard),
                };
                let guard = match waited {
                    Ok(guard) => guard,
                    Err(e) => {
                        telemetry::record_simplify_outcome(e.kind(), started.elapsed().as_millis() as u64);
                        tracing::warn!(error = %e, "gave up waiting for identical in-flight call");
                        return Err(e);
                    }
                };
                if let Some(hit) = self.cache.get(&key) {
                    telemetry::record_cache_hit(request.language().code());
                    return Ok(hit);
                }
                Some(guard)
            }
            None => None,
        };
        telemetry::record_cache_miss(request.language().code());

        let request_id = uuid::Uuid::new_v4().to_string();
        let span = RequestSpan::simplify(&request_id, request.language().code());
        let result = self
            .call_backend(&request, deadline, &mut progress, &cancel)
            .instrument(span.clone())
            .await;
        let latency_ms = started.elapsed().as_millis() as u64;

        span.record("latency_ms", latency_ms);
        span.record_result(&result);

        match result {
            Ok(result) => {
                telemetry::record_simplify_outcome("ok", latency_ms);
                let result = Arc::new(result);
                self.cache.insert(key, Arc::clone(&result));
                Ok(result)
            }
            Err(e) => {
                telemetry::record_simplify_outcome(e.kind(), latency_ms);
                if e.is_warning() {
                    tracing::warn!(request_id = %request_id, error = %e, "simplify call aborted");
                } else {
                    tracing::error!(request_id = %request_id, error = %e, "simplify call failed");
                }
                Err(e)
            }
        }
    }

    async fn call_backend(
        &self,
        request: &SimplifyRequest,
        deadline: Instant,
        progress: &mut ProgressTimer,
        cancel: &CancellationToken,
    ) -> Result<SimplifyResult, SimplifyError> {
        let deadline = sleep_until(deadline);
        tokio::pin!(deadline);
        let call = self.backend.process(request);
        tokio::pin!(call);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(SimplifyError::Cancelled),
                () = &mut deadline => return Err(SimplifyError::Timeout(self.config.request_timeout)),
                result = &mut call => return result,
                () = progress.expired(), if progress.is_armed() => progress.fire(),
            }
        }
    }

    /// Discard every cached result.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("simplify cache cleared");
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache(&self) -> &SimplifyCache {
        &self.cache
    }

    /// Retrieval path for a synthesized audio file. The name is opaque.
    pub fn audio_url(&self, filename: &str) -> String {
        format!(
            "{}/audio/{}",
            self.config.api_base_url.trim_end_matches('/'),
            filename
        )
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
