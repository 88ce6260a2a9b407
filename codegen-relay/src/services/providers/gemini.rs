//! Gemini provider.
//!
//! `generateContent` with a `contents/parts` payload; the API key travels in
//! the `key` query parameter.

use super::{
    extract, http_client, read_json_response, ProviderError, ProviderResponse, TextExtractor,
    TextProvider,
};
use crate::config::GenerationConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GenerationConfig,
    client: Client,
    extractor: TextExtractor,
}

impl GeminiTextProvider {
    pub fn new(config: GenerationConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        Ok(Self {
            config,
            client: http_client()?,
            extractor: extract::candidate_text,
        })
    }

    /// Replace the extraction strategy.
    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method
        )
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![ContentPart { text: prompt }],
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .query(&[("key", self.config.api_key.expose_secret().as_str())])
            .json(&request)
            .send()
            .await
            // The request URL carries the API key.
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        let raw = read_json_response(self.name(), response).await?;
        let text = (self.extractor)(&raw);

        Ok(ProviderResponse { text, raw })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ============================================================================
// Gemini API Request Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
struct ContentPart<'a> {
    text: &'a str,
}
