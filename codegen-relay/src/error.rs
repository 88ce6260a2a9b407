use crate::services::{ProviderError, StoreError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure of one relay request. Every variant is terminal for that request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The inbound body could not be read as JSON.
    #[error("{0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Generation(#[from] ProviderError),

    /// Store failures other than a rejected write, which is reported in the
    /// response body instead.
    #[error(transparent)]
    Storage(StoreError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RelayError::Generation(ProviderError::Upstream { status, body }) => {
                (status, format!("Error generating code: {}", body))
            }
            RelayError::Generation(ProviderError::InvalidResponse(raw)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error parsing generation response: {}", raw),
            ),
            other => {
                tracing::error!(error = %other, "Unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error: {}", other),
                )
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_propagated() {
        let response = RelayError::Generation(ProviderError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "quota".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn everything_else_is_internal() {
        for err in [
            RelayError::MalformedRequest("EOF while parsing".to_string()),
            RelayError::Generation(ProviderError::NetworkError("refused".to_string())),
            RelayError::Generation(ProviderError::InvalidResponse("<html>".to_string())),
            RelayError::Storage(StoreError::NetworkError("reset".to_string())),
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
