use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::errors::ChatError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub question: String,
}

/// One chat turn. Blank questions are rejected here so the engine never
/// sees them; a missing session id starts a fresh session whose id is
/// returned to the client.
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<Value>, ChatError> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(ChatError::BadRequest("question must not be empty".to_string()));
    }

    let session_id = payload
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let (result, token_count) = state
        .sessions
        .record_turn(&state.engine, &session_id, question)
        .await?;

    Ok(Json(json!({
        "session_id": session_id,
        "answer": result.answer,
        "source_titles": result.source_titles,
        "primary_source": result.primary_source(),
        "token_count": token_count,
    })))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ChatError> {
    // No session id means no turn has happened yet: an empty view, and
    // no session is created for it.
    let Some(session_id) = params.get("session_id").filter(|id| !id.is_empty()) else {
        return Ok(Json(json!({ "messages": [], "token_count": 0 })));
    };

    let (messages, token_count) = state.sessions.snapshot(session_id).await;
    Ok(Json(json!({
        "messages": messages,
        "token_count": token_count,
    })))
}
