use async_trait::async_trait;

use super::types::RetrievedDocument;
use crate::core::errors::ChatError;

#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// return the backend name (e.g. "elastic")
    fn name(&self) -> &str;

    /// check if the backend is reachable
    async fn health_check(&self) -> Result<bool, ChatError>;

    /// search for documents matching the query, best match first.
    /// The returned sequence may be empty.
    async fn search(&self, query: &str) -> Result<Vec<RetrievedDocument>, ChatError>;
}
