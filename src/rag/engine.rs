use std::sync::Arc;

use serde::Serialize;

use super::prompt::build_prompt;
use crate::core::errors::ChatError;
use crate::generation::AnswerGenerator;
use crate::retrieval::DocumentRetriever;

/// The engine's return value for one turn.
///
/// `source_titles` carries every retrieved title in retrieval order.
/// The original tool attributed the answer to whichever document it saw
/// last; `primary_source` keeps that value available for the UI caption.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub answer: String,
    pub source_titles: Vec<String>,
}

impl QueryResult {
    pub fn primary_source(&self) -> Option<&str> {
        self.source_titles.last().map(String::as_str)
    }
}

/// Composes retriever and generator into a single
/// `ask(question) -> QueryResult` operation. Stateless: session history
/// is owned elsewhere and never touched here.
#[derive(Clone)]
pub struct RagEngine {
    retriever: Arc<dyn DocumentRetriever>,
    generator: Arc<dyn AnswerGenerator>,
}

impl RagEngine {
    pub fn new(retriever: Arc<dyn DocumentRetriever>, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    /// Answer one question: retrieve, build the prompt, generate.
    ///
    /// Failures surface once; nothing is retried. Empty or whitespace
    /// questions are passed through unvalidated (callers reject them at
    /// the HTTP boundary).
    pub async fn ask(&self, question: &str) -> Result<QueryResult, ChatError> {
        let documents = self.retriever.search(question).await?;
        tracing::info!(
            backend = self.retriever.name(),
            documents = documents.len(),
            "retrieval complete"
        );

        let prompt = build_prompt(question, &documents);
        let answer = self.generator.generate(&prompt).await?;
        if answer.trim().is_empty() {
            return Err(ChatError::Generation(
                "generator returned an empty answer".to_string(),
            ));
        }

        let source_titles = documents.into_iter().map(|doc| doc.title).collect();
        Ok(QueryResult {
            answer,
            source_titles,
        })
    }
}
