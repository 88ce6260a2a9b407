//! Mock provider for handler-level testing.

use super::{ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Mutex;

enum Outcome {
    Text(Option<String>),
    Upstream(StatusCode, String),
}

/// Returns a canned outcome and remembers every prompt it was given.
pub struct MockTextProvider {
    outcome: Outcome,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    /// Reply successfully with `text`; `None` mimics a reply without any text.
    pub fn returning(text: Option<&str>) -> Self {
        Self {
            outcome: Outcome::Text(text.map(str::to_string)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reply with a non-success status and raw body.
    pub fn failing(status: StatusCode, body: &str) -> Self {
        Self {
            outcome: Outcome::Upstream(status, body.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.outcome {
            Outcome::Text(text) => Ok(ProviderResponse {
                text: text.clone(),
                raw: text
                    .as_ref()
                    .map(|t| json!({ "text": t }))
                    .unwrap_or(Value::Null),
            }),
            Outcome::Upstream(status, body) => Err(ProviderError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
