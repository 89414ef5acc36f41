use crate::error::ApiError;
use crate::server::AppState;
use askme_core::{Message, Role};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Chat request body. `session_id` is optional; a missing or stale id gets
/// a fresh session transparently.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Session to continue, if any.
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

/// Chat response body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The assistant's reply.
    pub response: String,
    /// The session the exchange was recorded under.
    pub session_id: Uuid,
    /// Queries left before the session's quota is exhausted.
    pub remaining_queries: u32,
}

/// Response for session creation.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The freshly created session.
    pub session_id: Uuid,
    /// Full quota at creation.
    pub remaining_queries: u32,
}

/// Response for the history route.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// The session the history belongs to.
    pub session_id: Uuid,
    /// Bounded message history, oldest first. Empty for unknown sessions.
    pub history: Vec<Message>,
    /// Queries left; 0 for unknown or expired sessions.
    pub remaining_queries: u32,
}

/// `GET /` — service banner.
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "AskMe Bot API is running!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "chat": "/api/chat",
            "new_session": "/api/session/new",
            "health": "/health",
        }
    }))
}

/// `GET /health` — liveness plus a session-count gauge.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "AskMe API is running",
        "active_sessions": state.sessions.active_sessions(),
    }))
}

/// `POST /api/session/new` — explicit session creation.
pub async fn create_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let session_id = state.sessions.create();
    info!(session_id = %session_id, "session created");
    Json(SessionResponse {
        session_id,
        remaining_queries: state.sessions.remaining_queries(session_id),
    })
}

/// `POST /api/chat` — one conversational exchange.
///
/// Store mutations bracket the model call; no store state is held across
/// the await.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::bad_request("Message cannot be empty"));
    }

    // Reuse the supplied session if it is still alive, otherwise start over.
    let session_id = match request.session_id {
        Some(id) if state.sessions.get(id).is_some() => id,
        _ => {
            let id = state.sessions.create();
            info!(session_id = %id, "session created lazily for chat");
            id
        }
    };

    if !state.sessions.can_query(session_id) {
        return Err(ApiError::too_many_requests(
            "Query limit reached for this session. Please start a new session.",
        ));
    }

    state
        .sessions
        .append_message(session_id, message.as_str(), Role::User)
        .map_err(|_| ApiError::not_found("Session expired"))?;

    // Context for the model excludes the message we just appended.
    let mut context = state.sessions.history(session_id);
    context.pop();

    let reply = match state.model.generate(&message, &context).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(session_id = %session_id, error = %e, "model call failed");
            return Err(ApiError::bad_gateway(format!(
                "Error processing request: {e}"
            )));
        }
    };

    // The session can expire mid-call; the reply is still worth returning.
    if let Err(e) = state
        .sessions
        .append_message(session_id, reply.as_str(), Role::Assistant)
    {
        warn!(session_id = %session_id, error = %e, "session vanished before reply append");
    }

    Ok(Json(ChatResponse {
        response: reply,
        session_id,
        remaining_queries: state.sessions.remaining_queries(session_id),
    }))
}

/// `GET /api/session/{session_id}/history` — bounded history readout.
///
/// Unknown and expired sessions read as empty, never as an error.
pub async fn session_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        session_id,
        history: state.sessions.history(session_id),
        remaining_queries: state.sessions.remaining_queries(session_id),
    })
}
