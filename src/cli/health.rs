//! `health`: probe a running relay over HTTP.

use std::time::Duration;

use crate::health::HealthReport;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe `{base_url}/health`.
///
/// Returns exit code: 0 on healthy, 1 on unhealthy or unreachable.
pub async fn run_health(base_url: &str, json: bool) -> i32 {
    match probe(base_url).await {
        Ok(report) => {
            if json {
                match serde_json::to_string(&report) {
                    Ok(text) => println!("{text}"),
                    Err(e) => eprintln!("Error: {e}"),
                }
            } else {
                println!("{}: {:?}", report.service, report.status);
            }
            if report.is_healthy() {
                0
            } else {
                1
            }
        }
        Err(e) => {
            eprintln!("Error probing relay at {base_url}: {e}");
            eprintln!("Is the relay running? Check TRIAGE_API_BASE_URL.");
            1
        }
    }
}

pub async fn probe(base_url: &str) -> Result<HealthReport, reqwest::Error> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let client = reqwest::Client::builder().timeout(PROBE_TIMEOUT).build()?;
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<HealthReport>()
        .await
}
