use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for one chat turn and for session startup.
///
/// `Configuration` is fatal and only produced while building the
/// application state; `Retrieval` and `Generation` surface once per
/// turn and are never retried.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("retrieval failed: {0}")]
    Retrieval(String),
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ChatError {
    pub fn retrieval<E: std::fmt::Display>(err: E) -> Self {
        ChatError::Retrieval(err.to_string())
    }

    pub fn generation<E: std::fmt::Display>(err: E) -> Self {
        ChatError::Generation(err.to_string())
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ChatError::Configuration(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ChatError::Retrieval(msg) => {
                (StatusCode::BAD_GATEWAY, format!("retrieval failed: {}", msg))
            }
            ChatError::Generation(msg) => {
                (StatusCode::BAD_GATEWAY, format!("generation failed: {}", msg))
            }
            ChatError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_errors_map_to_bad_gateway() {
        let res = ChatError::Retrieval("search down".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

        let res = ChatError::Generation("model timeout".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn configuration_maps_to_service_unavailable() {
        let res = ChatError::Configuration("missing key".into()).into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn bad_request_maps_to_400() {
        let res = ChatError::BadRequest("empty question".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
