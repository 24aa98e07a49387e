use log::debug;
use reqwest::{Client, StatusCode};

use crate::types::{HealthEnvelope, HealthSnapshot};

/// Error raised when a probe attempt does not produce a usable snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    NetworkError(String),
    StatusError(u16),
    ParseError(String),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ProbeError::StatusError(code) => write!(f, "Unexpected status: {}", code),
            ProbeError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Fetches the health endpoint and parses the response
///
/// One probe is one GET of the configured URL (the GraphQL query string is
/// baked into the URL). A failed attempt is final for the current tick;
/// the scheduler's next tick is the retry.
pub struct HealthProbe {
    endpoint: String,
    client: Client,
}

impl HealthProbe {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Fetch one health snapshot
    ///
    /// Succeeds only on an exact 200 with a body matching the expected
    /// shape. No partial data is extracted from a malformed response.
    pub async fn probe(&self) -> Result<HealthSnapshot, ProbeError> {
        debug!("probing {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| ProbeError::NetworkError(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(ProbeError::StatusError(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProbeError::NetworkError(e.to_string()))?;

        let envelope: HealthEnvelope =
            serde_json::from_str(&body).map_err(|e| ProbeError::ParseError(e.to_string()))?;

        Ok(envelope.into())
    }
}
