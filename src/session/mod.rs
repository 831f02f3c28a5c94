//! In-memory session state: conversation history and usage counter.
//!
//! One `SessionState` per browser session, created lazily on first
//! access and dropped with the process. Nothing is persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::core::errors::ChatError;
use crate::rag::{QueryResult, RagEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Human,
    Ai,
}

/// One chat bubble. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub origin: Origin,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SessionState {
    pub history: Vec<Message>,
    pub token_count: u64,
}

/// Owns every live session. The lock is held for the full duration of a
/// turn, external calls included, so at most one turn is in flight at a
/// time and duplicate submits serialize instead of interleaving.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Run one turn: ask the engine, then append the human question and
    /// the AI answer to the session's history, in that order.
    ///
    /// On failure nothing is appended and the counter is untouched; the
    /// session looks exactly as it did before the call.
    pub async fn record_turn(
        &self,
        engine: &RagEngine,
        session_id: &str,
        question: &str,
    ) -> Result<(QueryResult, u64), ChatError> {
        let mut sessions = self.sessions.lock().await;

        let result = engine.ask(question).await?;

        let session = sessions.entry(session_id.to_string()).or_default();
        let now = Utc::now();
        session.history.push(Message {
            origin: Origin::Human,
            text: question.to_string(),
            created_at: now,
        });
        session.history.push(Message {
            origin: Origin::Ai,
            text: result.answer.clone(),
            created_at: now,
        });
        session.token_count += estimate_tokens(question) + estimate_tokens(&result.answer);

        Ok((result, session.token_count))
    }

    /// Ordered snapshot of a session's history plus its usage counter.
    /// Creates the session if it does not exist yet; calling this twice
    /// in a row is indistinguishable from calling it once.
    pub async fn snapshot(&self, session_id: &str) -> (Vec<Message>, u64) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(session_id.to_string()).or_default();
        (session.history.clone(), session.token_count)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Message total across all sessions, for the status endpoint.
    pub async fn total_messages(&self) -> usize {
        self.sessions
            .lock()
            .await
            .values()
            .map(|s| s.history.len())
            .sum()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn estimate_tokens(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
