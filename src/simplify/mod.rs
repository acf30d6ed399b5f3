//! Simplify/speak request orchestration.
//!
//! Wraps the remote simplify/translate/TTS backend with a bounded wait,
//! a one-time progress signal, caller cancellation and a `(text, language)`
//! result memo.

mod backend;
mod cache;
mod coalesce;
mod error;
mod orchestrator;
mod progress;
mod types;

pub use backend::{HttpBackend, SimplifyBackend, PROCESS_PATH};
pub use cache::SimplifyCache;
pub use coalesce::InflightGate;
pub use error::SimplifyError;
pub use orchestrator::{
    Orchestrator, OrchestratorConfig, DEFAULT_PROGRESS_AFTER, DEFAULT_REQUEST_TIMEOUT,
};
pub use progress::{ProgressEvent, ProgressSink, ProgressTimer};
pub use types::{CacheKey, Language, SimplifyRequest, SimplifyResult, TermExplanation};
