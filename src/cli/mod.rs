//! CLI subcommands for `triage-core-cli`.
//!
//! ## Usage
//!
//! ```bash
//! triage-core-cli serve                          # run the relay
//! triage-core-cli health                         # probe a running relay
//! triage-core-cli simplify --lang kn "text..."   # one simplify/speak call
//! triage-core-cli analyze "cough and fever"      # classifier only, offline
//! triage-core-cli triage "cough and fever"       # analyze, then simplify
//! triage-core-cli config show|defaults|validate
//! ```

pub mod config_cmd;
pub mod health;
pub mod request_cmd;
pub mod serve;

use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::relay::RelayError;
use crate::simplify::{Language, SimplifyError};
use crate::triage::TriageError;

pub use health::run_health;
pub use request_cmd::{run_analyze, run_simplify, run_triage, StderrProgress};
pub use serve::run_serve;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Simplify(#[from] SimplifyError),

    #[error(transparent)]
    Triage(#[from] TriageError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}

/// Arguments shared by the request subcommands.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestArgs {
    pub text: String,
    pub language: Option<Language>,
    pub json: bool,
}

impl RequestArgs {
    /// Parse `[--lang CODE] [--json] [--text TEXT | WORDS...]`. Positional
    /// words are joined with single spaces.
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut out = Self::default();
        let mut words: Vec<&str> = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--lang" | "--language" => {
                    let code = iter
                        .next()
                        .ok_or_else(|| CliError::Usage(format!("Missing value for {arg}")))?;
                    out.language = Some(Language::from(code.as_str()));
                }
                "--text" | "--symptoms" => {
                    let text = iter
                        .next()
                        .ok_or_else(|| CliError::Usage(format!("Missing value for {arg}")))?;
                    words.push(text);
                }
                "--json" => out.json = true,
                flag if flag.starts_with("--") => {
                    return Err(CliError::Usage(format!("Unknown argument: {flag}")));
                }
                word => words.push(word),
            }
        }
        out.text = words.join(" ");
        if out.text.trim().is_empty() {
            return Err(CliError::Usage("No input text given".to_string()));
        }
        Ok(out)
    }
}
