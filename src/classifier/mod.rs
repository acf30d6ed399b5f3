//! Symptom classification capability.
//!
//! The classifier is a swappable strategy: anything that maps free-text
//! symptoms to ranked candidate conditions and a summary. The bundled
//! [`KeywordClassifier`] is a demo rule set, not a diagnostic model.

mod keyword;
mod rules;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use keyword::{KeywordClassifier, MAX_CANDIDATES};

/// Used when there is no top candidate to describe.
pub const GENERIC_SUMMARY: &str = "Based on the symptoms provided, here are some potential conditions. Please consult with a healthcare professional for proper diagnosis.";

/// A ranked candidate condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCondition {
    pub condition: String,
    /// In `0.0..=1.0`.
    pub probability: f64,
    pub description: String,
}

/// Classifier output: candidates by descending probability plus a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub conditions: Vec<CandidateCondition>,
    pub summary: String,
}

impl Assessment {
    /// Build from already-ranked candidates, summarizing the top one.
    pub fn from_ranked(conditions: Vec<CandidateCondition>) -> Self {
        let summary = match conditions.first() {
            Some(top) => format!(
                "Based on your symptoms, the most likely condition is {} ({}% probability). {} Please consult with a healthcare professional for proper diagnosis and treatment.",
                top.condition,
                (top.probability * 100.0).round() as u32,
                top.description
            ),
            None => GENERIC_SUMMARY.to_string(),
        };
        Self {
            conditions,
            summary,
        }
    }

    pub fn top(&self) -> Option<&CandidateCondition> {
        self.conditions.first()
    }
}

/// Maps free-text symptoms to an [`Assessment`]. Must be pure.
pub trait SymptomClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Assessment;
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to build keyword matcher: {0}")]
    Build(String),
}
