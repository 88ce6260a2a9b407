//! Generation Service abstractions and implementations.
//!
//! Each provider owns its request schema, its authentication scheme and the
//! strategy used to pull text out of the reply. Orchestration only ever sees
//! [`TextProvider`].

pub mod completions;
pub mod extract;
pub mod gemini;
pub mod mock;

pub use extract::TextExtractor;

use crate::config::{GenerationConfig, ProviderKind};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// User agent sent on every outbound call.
pub const USER_AGENT: &str = concat!("codegen-relay/", env!("CARGO_PKG_VERSION"));

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Non-success status; `body` is the raw upstream text.
    #[error("Generation API error {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    /// Success status but the body was not JSON; carries the raw text.
    #[error("Failed to parse generation response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Parsed provider reply.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Text found by the provider's extraction strategy, untrimmed.
    pub text: Option<String>,

    /// Full JSON reply.
    pub raw: Value,
}

/// Trait for text generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send `prompt` to the Generation Service.
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Construct the provider selected by configuration.
pub fn build_provider(config: &GenerationConfig) -> Result<Arc<dyn TextProvider>, ProviderError> {
    let provider: Arc<dyn TextProvider> = match config.provider {
        ProviderKind::Gemini => Arc::new(gemini::GeminiTextProvider::new(config.clone())?),
        ProviderKind::Completions => {
            Arc::new(completions::CompletionsTextProvider::new(config.clone())?)
        }
    };
    Ok(provider)
}

pub(crate) fn http_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e)))
}

/// Read a reply to completion and turn it into JSON, keeping the raw text for
/// every failure.
pub(crate) async fn read_json_response(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<Value, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

    tracing::debug!(provider, status = %status, body = %body, "Raw generation API response");

    if !status.is_success() {
        tracing::error!(provider, status = %status, body = %body, "Error from generation API");
        return Err(ProviderError::Upstream { status, body });
    }

    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::error!(provider, error = %e, "Error parsing generation API response");
            Err(ProviderError::InvalidResponse(body))
        }
    }
}
