//! Configuration loading from environment variables.
//!
//! All values come from `TRIAGE_*` environment variables with defaults.
//! Invalid values fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `TRIAGE_RELAY_ADDR` | 0.0.0.0:3001 | Relay listen address |
//! | `TRIAGE_BACKEND_URL` | http://localhost:5000 | Backend origin the relay forwards to |
//! | `TRIAGE_API_BASE_URL` | http://localhost:3001 | Base URL the orchestrator calls (the relay) |
//! | `TRIAGE_REQUEST_TIMEOUT_SECS` | 120 | Hard deadline per backend call |
//! | `TRIAGE_PROGRESS_AFTER_SECS` | 10 | Delay before the "still processing" signal |
//! | `TRIAGE_COALESCE_INFLIGHT` | false | Share one call between identical concurrent requests |
//! | `TRIAGE_MAX_BODY_BYTES` | 10485760 | Max relayed request body |
//! | `TRIAGE_SHUTDOWN_DRAIN_SECS` | 30 | Relay drain window on shutdown |
//! | `TRIAGE_LANGUAGE` | kn | Default target language |
//! | `TRIAGE_LOG_FORMAT` | json | `json` or `pretty` |
//! | `TRIAGE_LOG_LEVEL` | info | tracing filter directive |
//! | `TRIAGE_LOG_FILE` | (stderr) | JSON log file path |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::relay::{RelayConfig, DEFAULT_BACKEND_URL, DEFAULT_MAX_BODY_BYTES, DEFAULT_RELAY_ADDR};
use crate::simplify::{Language, OrchestratorConfig, DEFAULT_PROGRESS_AFTER, DEFAULT_REQUEST_TIMEOUT};
use crate::telemetry::{LogConfig, LogFormat};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_SHUTDOWN_DRAIN_SECS: u64 = 30;
const MIN_BODY_BYTES: usize = 1024;

/// Every variable this module reads.
pub const ENV_KEYS: &[&str] = &[
    "TRIAGE_RELAY_ADDR",
    "TRIAGE_BACKEND_URL",
    "TRIAGE_API_BASE_URL",
    "TRIAGE_REQUEST_TIMEOUT_SECS",
    "TRIAGE_PROGRESS_AFTER_SECS",
    "TRIAGE_COALESCE_INFLIGHT",
    "TRIAGE_MAX_BODY_BYTES",
    "TRIAGE_SHUTDOWN_DRAIN_SECS",
    "TRIAGE_LANGUAGE",
    "TRIAGE_LOG_FORMAT",
    "TRIAGE_LOG_LEVEL",
    "TRIAGE_LOG_FILE",
];

/// Effective configuration summary (serializable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub relay_addr: String,
    pub backend_url: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub progress_after_secs: u64,
    pub coalesce_inflight: bool,
    pub max_body_bytes: usize,
    pub shutdown_drain_secs: u64,
    pub language: String,
    pub log_format: String,
    pub log_level: String,
}

impl EffectiveConfig {
    /// `(VARIABLE, value)` pairs in table order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("TRIAGE_RELAY_ADDR", self.relay_addr.clone()),
            ("TRIAGE_BACKEND_URL", self.backend_url.clone()),
            ("TRIAGE_API_BASE_URL", self.api_base_url.clone()),
            ("TRIAGE_REQUEST_TIMEOUT_SECS", self.request_timeout_secs.to_string()),
            ("TRIAGE_PROGRESS_AFTER_SECS", self.progress_after_secs.to_string()),
            ("TRIAGE_COALESCE_INFLIGHT", self.coalesce_inflight.to_string()),
            ("TRIAGE_MAX_BODY_BYTES", self.max_body_bytes.to_string()),
            ("TRIAGE_SHUTDOWN_DRAIN_SECS", self.shutdown_drain_secs.to_string()),
            ("TRIAGE_LANGUAGE", self.language.clone()),
            ("TRIAGE_LOG_FORMAT", self.log_format.clone()),
            ("TRIAGE_LOG_LEVEL", self.log_level.clone()),
        ]
    }
}

/// All configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub relay_addr: SocketAddr,
    pub relay: RelayConfig,
    pub orchestrator: OrchestratorConfig,
    pub language: Language,
    pub log: LogConfig,
    pub shutdown_drain: Duration,
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a `usize` env var, returning `default` on missing or invalid.
fn parse_usize(key: &str, default: usize) -> usize {
    non_empty(key)
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

/// Parse a `u64` env var, returning `default` on missing or invalid.
fn parse_u64(key: &str, default: u64) -> u64 {
    non_empty(key)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

/// Accepts 1/0, true/false, yes/no, on/off.
fn parse_bool(key: &str, default: bool) -> bool {
    match non_empty(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

fn default_relay_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3001))
}

fn load_orchestrator_config() -> OrchestratorConfig {
    let timeout = parse_u64("TRIAGE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT.as_secs()).max(1);
    let progress = parse_u64("TRIAGE_PROGRESS_AFTER_SECS", DEFAULT_PROGRESS_AFTER.as_secs()).max(1);
    OrchestratorConfig {
        api_base_url: non_empty("TRIAGE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        request_timeout: Duration::from_secs(timeout),
        progress_after: Duration::from_secs(progress),
        coalesce_inflight: parse_bool("TRIAGE_COALESCE_INFLIGHT", false),
    }
}

fn load_relay_config() -> RelayConfig {
    RelayConfig {
        backend_url: non_empty("TRIAGE_BACKEND_URL")
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
        max_body_bytes: parse_usize("TRIAGE_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)
            .max(MIN_BODY_BYTES),
    }
}

fn load_log_config() -> LogConfig {
    let format = non_empty("TRIAGE_LOG_FORMAT")
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or_default();
    LogConfig {
        format,
        level: non_empty("TRIAGE_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        output_path: non_empty("TRIAGE_LOG_FILE").map(PathBuf::from),
    }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to defaults without panicking.
pub fn load() -> EnvConfig {
    let relay_addr = non_empty("TRIAGE_RELAY_ADDR")
        .and_then(|v| v.parse::<SocketAddr>().ok())
        .unwrap_or_else(default_relay_addr);
    let language = non_empty("TRIAGE_LANGUAGE")
        .map(Language::from)
        .unwrap_or_default();
    let drain_secs = parse_u64("TRIAGE_SHUTDOWN_DRAIN_SECS", DEFAULT_SHUTDOWN_DRAIN_SECS).max(1);

    EnvConfig {
        relay_addr,
        relay: load_relay_config(),
        orchestrator: load_orchestrator_config(),
        language,
        log: load_log_config(),
        shutdown_drain: Duration::from_secs(drain_secs),
    }
}

impl EnvConfig {
    /// Return a serializable summary of all effective values.
    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            relay_addr: self.relay_addr.to_string(),
            backend_url: self.relay.backend_url.clone(),
            api_base_url: self.orchestrator.api_base_url.clone(),
            request_timeout_secs: self.orchestrator.request_timeout.as_secs(),
            progress_after_secs: self.orchestrator.progress_after.as_secs(),
            coalesce_inflight: self.orchestrator.coalesce_inflight,
            max_body_bytes: self.relay.max_body_bytes,
            shutdown_drain_secs: self.shutdown_drain.as_secs(),
            language: self.language.code().to_string(),
            log_format: self.log.format.as_str().to_string(),
            log_level: self.log.level.clone(),
        }
    }
}

/// Documented defaults, independent of the current environment.
pub fn defaults() -> EffectiveConfig {
    EffectiveConfig {
        relay_addr: DEFAULT_RELAY_ADDR.to_string(),
        backend_url: DEFAULT_BACKEND_URL.to_string(),
        api_base_url: DEFAULT_API_BASE_URL.to_string(),
        request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        progress_after_secs: DEFAULT_PROGRESS_AFTER.as_secs(),
        coalesce_inflight: false,
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        shutdown_drain_secs: DEFAULT_SHUTDOWN_DRAIN_SECS,
        language: Language::default().code().to_string(),
        log_format: LogFormat::default().as_str().to_string(),
        log_level: "info".to_string(),
    }
}

/// Serializes tests that mutate process environment.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn clear_env_vars() {
    for k in ENV_KEYS {
        std::env::remove_var(k);
    }
}
