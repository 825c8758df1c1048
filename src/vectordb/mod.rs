//! Text-record vector index (Pinecone integrated inference).
//!
//! The index embeds and reranks on the provider side, so this module only
//! moves text records in and scored hits out.

pub mod client;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;

#[cfg(test)]
mod tests;

pub use client::{PineconeClient, VectorIndex};
pub use config::PineconeConfig;
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorIndex, text_similarity};
pub use model::{CHUNK_TEXT_FIELD, HitFields, RerankSpec, SearchHit, SearchRequest, TextRecord};
