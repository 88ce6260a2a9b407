//! Generate-and-store flow.
//!
//! The Generation Service call always completes before the Artifact Store is
//! touched; neither call is retried and a failed write never undoes the
//! generation.

use crate::error::RelayError;
use crate::models::{ArtifactWrite, GenerationRequest, GenerationResult, RelayResponse};
use crate::services::artifact_store::StoreError;
use crate::startup::AppState;
use reqwest::StatusCode;
use serde_json::{json, Value};

pub async fn generate_and_store(
    state: &AppState,
    request: &GenerationRequest,
) -> Result<RelayResponse, RelayError> {
    let provider = &state.text_provider;

    tracing::info!(
        provider = provider.name(),
        prompt_len = request.prompt.len(),
        "Generating code"
    );

    let response = provider.generate(&request.prompt).await?;
    let result = GenerationResult::from_extracted(response.text);

    tracing::debug!(generated = %result.text, "Generated code");

    let write = ArtifactWrite::new(&state.config.artifact.path, &request.prompt, &result);

    let github_response = match state.artifact_store.put(&write).await {
        Ok(body) => {
            tracing::info!(path = %write.path, branch = %write.branch, "Artifact stored");
            body
        }
        Err(StoreError::Rejected { status, body }) => {
            tracing::warn!(path = %write.path, status = %status, "Artifact store rejected write");
            rejected_write(status, &body)
        }
        Err(e) => return Err(RelayError::Storage(e)),
    };

    Ok(RelayResponse {
        generated_code: result.text,
        github_response,
    })
}

/// Error object reported in place of the store's reply.
fn rejected_write(status: StatusCode, body: &str) -> Value {
    let mut error = json!({
        "error": format!("Error pushing to GitHub: {}", body),
        "status": status.as_u16(),
    });

    if let Ok(details) = serde_json::from_str::<Value>(body) {
        error["details"] = details;
    }

    error
}
