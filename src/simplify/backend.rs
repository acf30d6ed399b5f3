//! Simplify/TTS backend capability and its HTTP implementation.

use async_trait::async_trait;
use reqwest::Url;

use super::error::SimplifyError;
use super::types::{SimplifyRequest, SimplifyResult};

/// Path of the processing endpoint, relative to the API base URL.
pub const PROCESS_PATH: &str = "/api/process";

/// Remote service that simplifies, translates and synthesizes speech.
#[async_trait]
pub trait SimplifyBackend: Send + Sync {
    /// Issue one call. Implementations must not retry.
    async fn process(&self, request: &SimplifyRequest) -> Result<SimplifyResult, SimplifyError>;
}

/// `POST {base}/api/process` over reqwest.
///
/// The client has no timeout of its own; the orchestrator owns the deadline
/// and drops this future when it expires.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpBackend {
    pub fn new(api_base_url: &str) -> Result<Self, SimplifyError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SimplifyError::unknown(format!("http client init failed: {e}")))?;
        Self::with_client(client, api_base_url)
    }

    pub fn with_client(client: reqwest::Client, api_base_url: &str) -> Result<Self, SimplifyError> {
        let raw = format!("{}{}", api_base_url.trim_end_matches('/'), PROCESS_PATH);
        let endpoint = Url::parse(&raw)
            .map_err(|e| SimplifyError::InputValidation(format!("invalid api base url {api_base_url:?}: {e}")))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SimplifyBackend for HttpBackend {
    async fn process(&self, request: &SimplifyRequest) -> Result<SimplifyResult, SimplifyError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SimplifyError::Server {
                status: status.as_u16(),
            });
        }

        // A body cut short is a transport failure; only a complete body that
        // does not parse counts as malformed.
        let body = response.bytes().await?;
        serde_json::from_slice::<SimplifyResult>(&body)
            .map_err(|e| SimplifyError::unknown(format!("malformed backend payload: {e}")))
    }
}
