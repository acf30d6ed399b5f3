//! `triage-core-cli` entry point.
//!
//! ## CLI Subcommands
//!
//! - `triage-core-cli` or `triage-core-cli serve` - Run the HTTP relay (default)
//! - `triage-core-cli health` - Probe a running relay (exit 0/1)
//! - `triage-core-cli simplify TEXT` - One simplify/speak call
//! - `triage-core-cli analyze SYMPTOMS` - Classify symptoms offline
//! - `triage-core-cli triage SYMPTOMS` - Classify, then simplify the summary
//! - `triage-core-cli config show|defaults|validate`

use std::process::ExitCode;

use triage_core::cli::{self, config_cmd, CliError, EXIT_USAGE};
use triage_core::config::{self as triage_config, EnvConfig};
use triage_core::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("serve");
    let rest = args.get(2..).unwrap_or(&[]);

    match command {
        "serve" | "" => {
            let env = start(true);
            finish(cli::run_serve(&env).await)
        }
        "health" => {
            let env = triage_config::load();
            let json = rest.iter().any(|a| a == "--json");
            exit(cli::run_health(&env.orchestrator.api_base_url, json).await)
        }
        "simplify" => {
            let env = start(false);
            finish(cli::run_simplify(rest, &env).await)
        }
        "analyze" => {
            start(false);
            finish(cli::run_analyze(rest).await)
        }
        "triage" => {
            let env = start(false);
            finish(cli::run_triage(rest, &env).await)
        }
        "config" => {
            let subcommand = rest.first().map(|s| s.as_str()).unwrap_or("show");
            let json = rest.iter().any(|a| a == "--json");
            match subcommand {
                "show" => exit(config_cmd::run_show(json)),
                "defaults" => exit(config_cmd::run_defaults(json)),
                "validate" => exit(config_cmd::run_validate()),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_command_help("config");
                    exit(EXIT_USAGE)
                }
            }
        }
        "help" | "--help" | "-h" => {
            if let Some(subcommand) = rest.first() {
                print_command_help(subcommand);
            } else {
                print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("triage-core-cli {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            exit(EXIT_USAGE)
        }
    }
}

/// Load configuration and install the subscriber. The relay logs with the
/// configured format; one-shot commands only log warnings unless
/// `TRIAGE_LOG_LEVEL` says otherwise.
fn start(service: bool) -> EnvConfig {
    let env = triage_config::load();
    let mut log = env.log.clone();
    if !service && std::env::var("TRIAGE_LOG_LEVEL").is_err() {
        log.level = "warn".to_string();
    }
    if let Err(e) = telemetry::init_logging(&log) {
        eprintln!("Logging disabled: {}", e);
    }
    env
}

fn finish(result: Result<(), CliError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(e.exit_code())
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(code.clamp(0, 255) as u8)
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "triage-core-cli v{}

USAGE:
    triage-core-cli [COMMAND] [OPTIONS]

COMMANDS:
    serve        Run the HTTP relay (default when no command given)
    health       Probe a running relay (exit 0 if healthy, 1 otherwise)
    simplify     Simplify, translate and synthesize speech for a text
    analyze      Classify symptoms locally (no network)
    triage       Classify symptoms, then simplify the summary
    config       Show or validate configuration (show, defaults, validate)
    version      Show version information
    help         Show this help message

EXAMPLES:
    triage-core-cli serve
    triage-core-cli simplify --lang kn \"You may have a mild infection.\"
    triage-core-cli analyze \"cough, runny nose\"
    triage-core-cli triage --lang en --json \"headache and nausea\"
    triage-core-cli config validate

ENVIRONMENT:
    TRIAGE_API_BASE_URL  Base URL for /api/process and /audio (default: http://localhost:3001)
    TRIAGE_BACKEND_URL   Backend origin the relay forwards to (default: http://localhost:5000)
    TRIAGE_LOG_LEVEL     tracing filter (default: info for serve, warn otherwise)
    See `triage-core-cli config defaults` for the full list.

EXIT CODES:
    0  Success / Healthy
    1  Failure / Unhealthy
    2  Usage error",
        version
    );
}

/// Print detailed help for a specific command.
fn print_command_help(command: &str) {
    match command {
        "serve" => eprintln!(
            "triage-core-cli serve - Run the HTTP relay

ROUTES:
    GET /health            {{\"status\":\"healthy\",\"service\":\"proxy-server\"}}
    GET /audio/:filename   Backend audio, streamed as audio/mpeg
    ANY /api, /api/*       Forwarded to TRIAGE_BACKEND_URL

Listens on TRIAGE_RELAY_ADDR. On Ctrl-C or SIGTERM new requests get 503,
in-flight ones get TRIAGE_SHUTDOWN_DRAIN_SECS to finish."
        ),
        "health" => eprintln!(
            "triage-core-cli health [--json] - Probe TRIAGE_API_BASE_URL/health

EXIT CODES:
    0  Relay is healthy
    1  Relay is unhealthy or unreachable"
        ),
        "simplify" => eprintln!(
            "triage-core-cli simplify [--lang CODE] [--json] [--text TEXT | TEXT...]

Sends one request to TRIAGE_API_BASE_URL/api/process. Gives up after
TRIAGE_REQUEST_TIMEOUT_SECS; prints a notice after TRIAGE_PROGRESS_AFTER_SECS.
Ctrl-C cancels the call."
        ),
        "analyze" => eprintln!(
            "triage-core-cli analyze [--json] [--symptoms TEXT | TEXT...]

Runs the keyword classifier only. Output is demo content, not medical advice."
        ),
        "triage" => eprintln!(
            "triage-core-cli triage [--lang CODE] [--json] [--symptoms TEXT | TEXT...]

Classifies the symptoms, then simplifies the assessment summary."
        ),
        "config" => eprintln!(
            "triage-core-cli config [show|defaults|validate] [--json]

    show      Effective values after reading TRIAGE_* variables
    defaults  Documented defaults
    validate  Exit 1 with warnings for suspicious settings"
        ),
        _ => eprintln!(
            "No detailed help available for '{}'. Use 'triage-core-cli help' for general usage.",
            command
        ),
    }
}
