//! Role-aware summarization with provider fallback.
//!
//! The summarizer prefers the hosted provider when one is configured and
//! falls back to deterministic extractive summarization on any provider
//! failure. Summarization as a whole never fails: callers always receive a
//! summary plus the source that produced it.

pub mod fallback;
pub mod provider;

pub use fallback::FALLBACK_PLACEHOLDER;
pub use provider::{SummaryProvider, SummaryProviderError, get_summary_provider};

use crate::roles::{RoleCode, summary_config};
use serde::Serialize;

/// Ceiling on prompt content, in characters, to respect provider payload limits.
const MAX_PROMPT_CONTENT_CHARS: usize = 4000;

/// Which path produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarySource {
    /// Hosted summarization provider.
    Provider,
    /// Deterministic extractive fallback.
    Fallback,
}

/// A produced summary together with its provenance.
#[derive(Debug, Clone)]
pub struct SummaryOutput {
    /// Summary text.
    pub text: String,
    /// Path that produced the text.
    pub source: SummarySource,
}

/// Produces one summary per role, degrading to the extractive fallback.
pub struct Summarizer {
    provider: Option<Box<dyn SummaryProvider + Send + Sync>>,
}

impl Summarizer {
    /// Build a summarizer around an optional provider client.
    pub fn new(provider: Option<Box<dyn SummaryProvider + Send + Sync>>) -> Self {
        Self { provider }
    }

    /// Build a summarizer from the process configuration.
    pub fn from_config() -> Self {
        Self::new(get_summary_provider())
    }

    /// Summarize `content` for a role. Never fails.
    ///
    /// Provider errors of any kind are absorbed: the failure is logged at
    /// `warn` and the extractive fallback supplies the summary instead.
    pub async fn summarize(&self, content: &str, role: RoleCode, title: &str) -> SummaryOutput {
        if let Some(provider) = &self.provider {
            let config = summary_config(role);
            let context = build_prompt_context(title, content);
            let input = format!("{}\n\n{context}", config.instructions);
            match provider
                .invoke(config.model, &input, config.max_summary_chars)
                .await
            {
                Ok(text) if !text.is_empty() => {
                    return SummaryOutput {
                        text,
                        source: SummarySource::Provider,
                    };
                }
                Ok(_) => {
                    tracing::warn!(role = %role, "Provider returned empty summary; falling back");
                }
                Err(error) => {
                    tracing::warn!(
                        role = %role,
                        error = %error,
                        "Provider summarization failed; falling back to extractive"
                    );
                }
            }
        }

        SummaryOutput {
            text: fallback::extractive_summary(content),
            source: SummarySource::Fallback,
        }
    }
}

/// Build the document context sent to the provider: title prefix plus
/// whitespace-normalized content truncated to the payload ceiling.
pub(crate) fn build_prompt_context(title: &str, content: &str) -> String {
    let normalized = content.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = normalized.chars().take(MAX_PROMPT_CONTENT_CHARS).collect();
    format!("Document: {title}\n{truncated}")
}
