//! Liveness payload served by the relay at `/health`.

use serde::{Deserialize, Serialize};

/// Service name reported by the relay. Clients match on it.
pub const RELAY_SERVICE_NAME: &str = "proxy-server";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// `{"status":"healthy","service":"proxy-server"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthState,
    pub service: String,
}

impl HealthReport {
    /// The relay reports healthy whenever it can answer at all.
    pub fn relay() -> Self {
        Self {
            status: HealthState::Healthy,
            service: RELAY_SERVICE_NAME.to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}
