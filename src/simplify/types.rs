//! Request and result types for the simplify/speak call.
//!
//! Field names follow the backend wire format (snake_case JSON).

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::error::SimplifyError;

/// Target language for simplification, translation and speech.
///
/// Equality and hashing go by wire code, so `Other("kn")` is `Kannada`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    Kannada,
    English,
    /// Any other backend-supported code, passed through verbatim.
    Other(String),
}

impl Language {
    /// Wire code sent to the backend.
    pub fn code(&self) -> &str {
        match self {
            Self::Kannada => "kn",
            Self::English => "en",
            Self::Other(code) => code,
        }
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        match code.as_str() {
            "kn" => Self::Kannada,
            "en" => Self::English,
            _ => Self::Other(code),
        }
    }
}

impl From<&str> for Language {
    fn from(code: &str) -> Self {
        Self::from(code.to_string())
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Body of `POST /api/process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyRequest {
    text: String,
    language: Language,
}

impl SimplifyRequest {
    /// Build a request. Text is kept byte-for-byte; only emptiness is rejected.
    pub fn new(text: impl Into<String>, language: Language) -> Result<Self, SimplifyError> {
        let text = text.into();
        if text.is_empty() {
            return Err(SimplifyError::InputValidation("text cannot be empty".into()));
        }
        Ok(Self { text, language })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Exact `(text, language)` identity used for memoization.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            text: self.text.clone(),
            language: self.language.clone(),
        }
    }
}

/// Cache identity: exact text plus language, no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub text: String,
    pub language: Language,
}

impl CacheKey {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }
}

/// A medical term with its plain-language explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermExplanation {
    pub term: String,
    pub explanation: String,
}

/// Backend response for a simplify/speak call. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyResult {
    pub simplified_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub explanations: Vec<TermExplanation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_filename: Option<String>,
}
