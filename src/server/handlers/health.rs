use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ChatError;
use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ChatError> {
    let search_reachable = state.retriever.health_check().await.unwrap_or(false);
    let model_reachable = state.generator.health_check().await.unwrap_or(false);

    Ok(Json(json!({
        "initialized": true,
        "index": state.settings.search_index,
        "model_id": state.settings.model_id,
        "search_reachable": search_reachable,
        "model_reachable": model_reachable,
        "sessions": state.sessions.session_count().await,
        "total_messages": state.sessions.total_messages().await,
    })))
}
