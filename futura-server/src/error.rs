//! Error types for the Futura backend.

use crate::provider::ProviderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Chat service errors.
///
/// Wire bodies are fixed strings; upstream detail is never sent to the
/// client, only logged.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is required")]
    MissingMessage,

    #[error("Gemini API not configured")]
    NotConfigured,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Upstream(#[from] ProviderError),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ChatError::MissingMessage => (StatusCode::BAD_REQUEST, "Message is required"),
            ChatError::NotConfigured => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Gemini API not configured")
            }
            ChatError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "Session not found"),
            ChatError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while processing your request.",
            ),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ChatError::MissingMessage.to_string(), "Message is required");
        assert_eq!(
            ChatError::SessionNotFound("abc123".into()).to_string(),
            "Session not found: abc123"
        );
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ChatError::MissingMessage.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ChatError::NotConfigured.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ChatError::SessionNotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_upstream_detail_not_leaked() {
        let err = ChatError::Upstream(ProviderError {
            provider: "gemini".into(),
            model: "gemini-pro-latest".into(),
            message: "secret internal detail".into(),
            status_code: Some(500),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
