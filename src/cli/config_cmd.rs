//! Config CLI subcommands: show, defaults, validate.
//!
//! These read the environment directly; no relay needs to be running.

use crate::config::{self, EffectiveConfig, EnvConfig};
use crate::relay::RelayState;
use crate::shutdown::ShutdownCoordinator;
use crate::simplify::HttpBackend;
use crate::telemetry::LogFormat;

/// Print effective config as `KEY=value` lines, or JSON with `json`.
pub fn run_show(json: bool) -> i32 {
    print_config(&config::load().effective_config(), json)
}

/// Print documented defaults (no env overrides).
pub fn run_defaults(json: bool) -> i32 {
    print_config(&config::defaults(), json)
}

/// Problems worth reporting in an otherwise loadable configuration.
pub fn validation_warnings(env: &EnvConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if env.orchestrator.progress_after >= env.orchestrator.request_timeout {
        warnings.push(format!(
            "TRIAGE_PROGRESS_AFTER_SECS ({}) >= TRIAGE_REQUEST_TIMEOUT_SECS ({}); the progress signal can never fire",
            env.orchestrator.progress_after.as_secs(),
            env.orchestrator.request_timeout.as_secs()
        ));
    }

    if let Err(e) = HttpBackend::new(&env.orchestrator.api_base_url) {
        warnings.push(format!("TRIAGE_API_BASE_URL: {e}"));
    }

    if let Err(e) = RelayState::new(&env.relay, std::sync::Arc::new(ShutdownCoordinator::new())) {
        warnings.push(format!("TRIAGE_BACKEND_URL: {e}"));
    }

    for key in ["TRIAGE_LOG_FORMAT", "TRIAGE_COALESCE_INFLIGHT"] {
        if let Ok(raw) = std::env::var(key) {
            let recognised = match key {
                "TRIAGE_LOG_FORMAT" => raw.parse::<LogFormat>().is_ok(),
                _ => matches!(
                    raw.trim().to_ascii_lowercase().as_str(),
                    "1" | "0" | "true" | "false" | "yes" | "no" | "on" | "off"
                ),
            };
            if !recognised {
                warnings.push(format!("{key}={raw:?} is not recognised; default used"));
            }
        }
    }

    warnings
}

/// Returns 0 if valid, 1 if any warnings are found.
pub fn run_validate() -> i32 {
    let warnings = validation_warnings(&config::load());
    if warnings.is_empty() {
        println!("Configuration is valid.");
        return 0;
    }
    for w in &warnings {
        eprintln!("WARNING: {w}");
    }
    1
}

fn print_config(cfg: &EffectiveConfig, json: bool) -> i32 {
    if json {
        return match serde_json::to_string_pretty(cfg) {
            Ok(text) => {
                println!("{text}");
                0
            }
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        };
    }
    for (key, value) in cfg.entries() {
        println!("{key}={value}");
    }
    0
}
