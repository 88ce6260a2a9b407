//! Completions-style provider: `prompt/max_tokens` payload with a bearer token,
//! text read from `choices[0].text`.

use super::{
    extract, http_client, read_json_response, ProviderError, ProviderResponse, TextExtractor,
    TextProvider,
};
use crate::config::GenerationConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;

pub struct CompletionsTextProvider {
    config: GenerationConfig,
    client: Client,
    extractor: TextExtractor,
}

impl CompletionsTextProvider {
    pub fn new(config: GenerationConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Completions API key not configured".to_string(),
            ));
        }

        Ok(Self {
            config,
            client: http_client()?,
            extractor: extract::choice_text,
        })
    }

    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }
}

#[async_trait]
impl TextProvider for CompletionsTextProvider {
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        let request = CompletionRequest {
            model: &self.config.model,
            prompt,
            max_tokens: self.config.max_tokens,
        };
        let url = format!("{}/completions", self.config.api_base.trim_end_matches('/'));

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            max_tokens = self.config.max_tokens,
            "Sending request to completions API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let raw = read_json_response(self.name(), response).await?;
        let text = (self.extractor)(&raw);

        Ok(ProviderResponse { text, raw })
    }

    fn name(&self) -> &'static str {
        "completions"
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}
