//! Triage Core
//!
//! Client-side plumbing for a symptom triage demo: a keyword symptom
//! classifier, an orchestrator that sends text to a remote
//! simplify/translate/text-to-speech backend, and an HTTP relay that fronts
//! that backend for browsers.
//!
//! # Request Path
//!
//! - [`classifier`] turns free-text symptoms into ranked conditions and a summary.
//! - [`simplify::Orchestrator`] sends the summary to the backend with a
//!   hard deadline, a one-time "still processing" signal, caller
//!   cancellation and a `(text, language)` result memo.
//! - [`relay`] exposes `/api/*`, `/audio/:filename` and `/health` to clients.
//!
//! Classifier output is demo content, not medical advice.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod health;
pub mod relay;
pub mod shutdown;
pub mod simplify;
pub mod telemetry;
pub mod triage;

pub use classifier::{Assessment, CandidateCondition, KeywordClassifier, SymptomClassifier};
pub use simplify::{
    HttpBackend, Language, Orchestrator, OrchestratorConfig, ProgressEvent, SimplifyBackend,
    SimplifyError, SimplifyResult, TermExplanation,
};
pub use triage::{TriageError, TriageFlow, TriageOutcome};
