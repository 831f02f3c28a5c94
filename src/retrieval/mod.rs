//! Document retrieval against the external search backend.
//!
//! The `DocumentRetriever` trait is the seam the RAG engine depends on;
//! `ElasticRetriever` is the production implementation talking to an
//! Elasticsearch-style `_search` endpoint.

mod elastic;
mod retriever;
mod types;

pub use elastic::ElasticRetriever;
pub use retriever::DocumentRetriever;
pub use types::RetrievedDocument;
