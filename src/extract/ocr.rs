//! OCR collaborator interface and HTTP adapter.
//!
//! The engine exposes a scoped session lifecycle: acquire, recognize,
//! release. The adapter releases the session on both success and failure
//! paths; a failed release is logged and swallowed so the recognition result
//! is what callers see.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by the OCR collaborator.
#[derive(Debug, Error)]
pub enum OcrError {
    /// No OCR engine is configured for this deployment.
    #[error("No OCR engine configured")]
    NotConfigured,
    /// Engine could not be reached or refused a session.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
    /// Engine accepted the image but failed to recognize it.
    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),
    /// Engine response could not be parsed.
    #[error("Malformed OCR response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by OCR engines.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an image.
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// HTTP-backed OCR engine speaking the session protocol.
pub struct HttpOcrClient {
    http: Client,
    base_url: String,
}

impl HttpOcrClient {
    /// Construct a client for the engine at `base_url`.
    pub fn new(base_url: String) -> Self {
        let http = Client::builder()
            .user_agent("doctriage/ocr")
            .build()
            .expect("Failed to construct reqwest::Client for OCR");
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    async fn acquire_session(&self) -> Result<String, OcrError> {
        let response = self
            .http
            .post(self.endpoint("sessions"))
            .send()
            .await
            .map_err(|error| {
                OcrError::Unavailable(format!(
                    "failed to reach OCR engine at {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Unavailable(format!(
                "session request returned {status}: {body}"
            )));
        }

        let body: SessionResponse = response.json().await.map_err(|error| {
            OcrError::InvalidResponse(format!("failed to decode session response: {error}"))
        })?;
        Ok(body.session_id)
    }

    async fn recognize_in_session(
        &self,
        session_id: &str,
        image: &[u8],
    ) -> Result<String, OcrError> {
        let response = self
            .http
            .post(self.endpoint(&format!("sessions/{session_id}/recognize")))
            .header("content-type", "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|error| OcrError::Unavailable(format!("recognition request failed: {error}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::RecognitionFailed(format!(
                "engine returned {status}: {body}"
            )));
        }

        let body: RecognizeResponse = response.json().await.map_err(|error| {
            OcrError::InvalidResponse(format!("failed to decode recognition response: {error}"))
        })?;
        Ok(body.text.trim().to_string())
    }

    /// Release is best-effort; a leaked remote session is the engine's problem to expire.
    async fn release_session(&self, session_id: &str) {
        let result = self
            .http
            .delete(self.endpoint(&format!("sessions/{session_id}")))
            .send()
            .await;
        match result {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    session = session_id,
                    status = %response.status(),
                    "OCR session release returned error status"
                );
            }
            Err(error) => {
                tracing::warn!(session = session_id, error = %error, "OCR session release failed");
            }
            _ => {}
        }
    }
}

#[derive(Deserialize)]
struct SessionResponse {
    session_id: String,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    text: String,
}

#[async_trait]
impl OcrEngine for HttpOcrClient {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let session_id = self.acquire_session().await?;
        let result = self.recognize_in_session(&session_id, image).await;
        self.release_session(&session_id).await;
        result
    }
}

/// OCR engine stand-in used when no engine is configured: every image fails extraction.
pub struct DisabledOcr;

#[async_trait]
impl OcrEngine for DisabledOcr {
    async fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
        Err(OcrError::NotConfigured)
    }
}
