//! HTTP API routes.

use crate::error::ChatError;
use crate::prompt;
use crate::provider::{ChatRequest, Message, Provider};
use crate::session::{SessionStore, Turn};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    /// `None` when no API key was available at startup; every chat request
    /// then gets the configured-error response instead of a crash.
    pub provider: Option<Arc<dyn Provider>>,
    pub model: String,
}

impl AppState {
    pub fn new(provider: Option<Arc<dyn Provider>>, model: impl Into<String>) -> Self {
        Self {
            store: Arc::new(SessionStore::new()),
            provider,
            model: model.into(),
        }
    }
}

/// Build the application router.
///
/// CORS is wide open; the frontend runs on a different origin.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .route("/sessions/:id", get(get_session))
        .layer(cors)
        .with_state(state)
}

// ============ Health Check ============

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "futura-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ============ Chat ============

#[derive(Debug, Deserialize)]
struct ChatApiRequest {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatApiResponse {
    response: String,
    session_id: String,
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatApiRequest>,
) -> Result<impl IntoResponse, ChatError> {
    let provider = state.provider.clone().ok_or(ChatError::NotConfigured)?;

    // Validate before touching the store so a bad request never creates a
    // session as a side effect.
    let message = match request.message.as_deref() {
        Some(m) if !m.is_empty() => m,
        _ => return Err(ChatError::MissingMessage),
    };

    let (session_id, history) = state.store.resolve(request.session_id.as_deref()).await;

    let mut messages: Vec<Message> = history
        .iter()
        .map(|turn| Message {
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
        })
        .collect();
    messages.push(Message {
        role: "user".to_string(),
        content: message.to_string(),
    });

    let reply = provider
        .chat(ChatRequest {
            model: state.model.clone(),
            messages,
            max_tokens: None,
            temperature: None,
        })
        .await
        .map_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Upstream model call failed");
            ChatError::from(e)
        })?;

    // History keeps the raw reply; only the displayed text is stripped.
    state.store.append(&session_id, message, &reply.content).await;

    let response = if prompt::is_escalation(&reply.content) {
        tracing::warn!(session_id = %session_id, "Escalation triggered, handing off to a human agent");
        prompt::display_text(&reply.content)
    } else {
        reply.content.clone()
    };

    tracing::debug!(
        session_id = %session_id,
        latency_ms = reply.latency_ms,
        total_tokens = reply.usage.total_tokens,
        "Chat turn completed"
    );

    Ok(Json(ChatApiResponse {
        response,
        session_id,
    }))
}

// ============ Session Inspection ============

#[derive(Debug, Serialize)]
struct SessionResponse {
    session_id: String,
    turns: usize,
    history: Vec<Turn>,
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    let history = state
        .store
        .history(&id)
        .await
        .ok_or_else(|| ChatError::SessionNotFound(id.clone()))?;

    Ok(Json(SessionResponse {
        session_id: id,
        turns: history.len(),
        history,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        build_router(AppState::new(None, "gemini-pro-latest"))
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_without_provider_is_rejected() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "Hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Gemini API not configured");
    }

    #[tokio::test]
    async fn test_unknown_session_lookup_is_404() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/sessions/no-such-session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
