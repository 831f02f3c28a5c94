use async_trait::async_trait;

use crate::core::errors::ChatError;

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// return the backend name (e.g. "titan")
    fn name(&self) -> &str;

    /// check if the backend is reachable
    async fn health_check(&self) -> Result<bool, ChatError>;

    /// produce an answer for the given prompt.
    /// Implementations must never return an empty string; an empty model
    /// output is a `ChatError::Generation`.
    async fn generate(&self, prompt: &str) -> Result<String, ChatError>;
}
