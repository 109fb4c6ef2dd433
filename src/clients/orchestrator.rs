//! Orchestrator client
//!
//! The orchestrator is the external service that produces the conversational
//! reply for the growing conversation. It exposes a single session endpoint
//! taking the full message list and returning a `solution` string.

use crate::{Error, Result};

/// Request body for a session turn
#[derive(serde::Serialize)]
struct SessionRequest<'a> {
    messages: &'a [String],
}

/// Response from the orchestrator session endpoint
#[derive(serde::Deserialize)]
struct SessionResponse {
    #[serde(default)]
    solution: Option<String>,
}

/// Client for the external conversation orchestrator
pub struct OrchestratorClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrchestratorClient {
    /// Create a new orchestrator client
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is empty
    pub fn new(base_url: String) -> Result<Self> {
        if base_url.is_empty() {
            return Err(Error::Config("orchestrator URL required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run a session turn over the full conversation and return the reply
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response has no solution
    pub async fn start_session(&self, messages: &[String]) -> Result<String> {
        tracing::debug!(turns = messages.len(), "starting orchestrator session");

        let url = format!("{}/session", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&SessionRequest { messages })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "orchestrator request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "orchestrator error");
            return Err(Error::Orchestrator(format!(
                "orchestrator error {status}: {body}"
            )));
        }

        let result: SessionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse orchestrator response");
            e
        })?;

        result
            .solution
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Orchestrator("invalid response from orchestrator".to_string()))
    }
}
