use std::sync::Arc;

use crate::core::config::Settings;
use crate::core::errors::ChatError;
use crate::generation::{AnswerGenerator, TitanGenerator};
use crate::rag::RagEngine;
use crate::retrieval::{DocumentRetriever, ElasticRetriever};
use crate::session::SessionStore;

/// Shared application state: the configured engine, its two backends,
/// and the in-memory session store.
///
/// Built exactly once at startup; a missing or invalid configuration
/// fails here, before the server binds, and no chat function is
/// available.
pub struct AppState {
    pub settings: Settings,
    pub retriever: Arc<dyn DocumentRetriever>,
    pub generator: Arc<dyn AnswerGenerator>,
    pub engine: RagEngine,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn initialize(settings: Settings) -> Result<Arc<Self>, ChatError> {
        let retriever: Arc<dyn DocumentRetriever> = Arc::new(ElasticRetriever::new(&settings)?);
        let generator: Arc<dyn AnswerGenerator> = Arc::new(TitanGenerator::new(&settings)?);
        Ok(Self::with_backends(settings, retriever, generator))
    }

    /// Assemble state from explicit backends. Tests use this to wire in
    /// stub retrievers/generators.
    pub fn with_backends(
        settings: Settings,
        retriever: Arc<dyn DocumentRetriever>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Arc<Self> {
        let engine = RagEngine::new(retriever.clone(), generator.clone());
        Arc::new(AppState {
            settings,
            retriever,
            generator,
            engine,
            sessions: SessionStore::new(),
        })
    }
}
