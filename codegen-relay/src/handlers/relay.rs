use crate::error::RelayError;
use crate::models::{GenerationRequest, RelayResponse};
use crate::services::relay::generate_and_store;
use crate::startup::AppState;
use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use serde_json::Value;

/// `POST /`: generate code for the prompt and commit it.
///
/// A body that cannot be read or is not JSON answers 500, like every other
/// failure of the flow.
pub async fn generate(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<RelayResponse>, RelayError> {
    let body = body.map_err(|e| {
        tracing::warn!(error = %e, "Unreadable request body");
        RelayError::MalformedRequest(e.body_text())
    })?;

    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Malformed request body");
        RelayError::MalformedRequest(e.to_string())
    })?;

    let request = GenerationRequest::from_body(&body);
    let response = generate_and_store(&state, &request).await?;

    Ok(Json(response))
}
