//! Retrieval-augmented generation.
//!
//! - `prompt`: builds the generation prompt from question + documents
//! - `RagEngine`: composes retriever and generator into one
//!   `ask(question) -> QueryResult` operation

mod engine;
pub mod prompt;

pub use engine::{QueryResult, RagEngine};
