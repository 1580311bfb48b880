//! Hosted summarization provider interface and HTTP adapter.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const DEFAULT_PROVIDER_URL: &str = "https://api.summarize.example.com";

/// Errors surfaced while invoking the summarization provider.
#[derive(Debug, Error)]
pub enum SummaryProviderError {
    /// Provider was unreachable.
    #[error("Summarization provider unavailable: {0}")]
    Unavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by hosted summarization providers.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Produce a summary of `input` with the given model, bounded by `max_length` characters.
    async fn invoke(
        &self,
        model: &str,
        input: &str,
        max_length: usize,
    ) -> Result<String, SummaryProviderError>;
}

/// Build a provider client based on configuration.
///
/// Returns `None` when no credential is configured; the summarizer then runs
/// in fallback-only mode. That is a valid deployment, not an error.
pub fn get_summary_provider() -> Option<Box<dyn SummaryProvider + Send + Sync>> {
    let config = get_config();
    let api_key = config.summary_provider_api_key.clone()?;
    let base_url = config
        .summary_provider_url
        .clone()
        .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string());
    Some(Box::new(HttpSummaryProvider::new(base_url, api_key)))
}

struct HttpSummaryProvider {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HttpSummaryProvider {
    fn new(base_url: String, api_key: String) -> Self {
        let http = Client::builder()
            .user_agent("doctriage/summary")
            .build()
            .expect("Failed to construct reqwest::Client for summarization");
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/summarize", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    summary: String,
}

#[async_trait]
impl SummaryProvider for HttpSummaryProvider {
    async fn invoke(
        &self,
        model: &str,
        input: &str,
        max_length: usize,
    ) -> Result<String, SummaryProviderError> {
        let payload = json!({
            "model": model,
            "input": input,
            "max_length": max_length,
        });

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummaryProviderError::Unavailable(format!(
                    "failed to reach provider at {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryProviderError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: ProviderResponse = response.json().await.map_err(|error| {
            SummaryProviderError::InvalidResponse(format!(
                "failed to decode provider response: {error}"
            ))
        })?;

        Ok(body.summary.trim().to_string())
    }
}
