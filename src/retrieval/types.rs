use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One candidate document returned by the search backend.
///
/// Ephemeral: produced per query, consumed by the RAG engine, not retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl RetrievedDocument {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }
}
