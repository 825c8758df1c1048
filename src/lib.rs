//! Claimcheck library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! A claim flows through four collaborators, each behind a trait so the
//! pipeline can be exercised without network access:
//!
//! ## Pipeline
//! - [`FactChecker`], [`Claim`], [`VerificationResult`] - End-to-end claim verification
//! - [`ServiceConfig`] - Bundled collaborator configuration
//!
//! ## Collaborators
//! - [`PaperSearch`], [`CoreClient`] - Open-access paper search
//! - [`VectorIndex`], [`PineconeClient`] - Hosted vector index with integrated embedding
//! - [`SemanticIndex`] - Ephemeral index sessions and persistent-namespace search
//! - [`TextGenerator`], [`build_generator`] - LLM backends (local, OpenAI, Mistral, Gemini)
//! - [`VerificationClient`] - Prompting and tolerant decoding of model replies
//!
//! ## Server
//! - [`Config`] - HTTP bind settings
//! - [`gateway`] - Axum router and handlers
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod gateway;
pub mod index;
pub mod llm;
pub mod papers;
pub mod pipeline;
pub mod vectordb;
pub mod verify;

pub use config::{Config, ConfigError};
pub use index::{IndexConfig, IndexError, SemanticIndex, SessionToken, Snippet};
pub use llm::{LlmConfig, LlmError, ProviderKind, TextGenerator, build_generator};
pub use papers::{CoreClient, PaperQuery, PaperSearch, PaperSearchConfig, PaperSearchError, Work};
pub use pipeline::{CheckError, Claim, FactChecker, ServiceConfig, SourceVerdict, VerificationResult};
pub use vectordb::{PineconeClient, PineconeConfig, VectorDbError, VectorIndex};
pub use verify::{
    ComparisonResult, Decoded, DomainClassification, FactCheckResult, IndividualVerdict,
    SourceText, VerificationClient,
};

#[cfg(any(test, feature = "mock"))]
pub use llm::MockGenerator;
#[cfg(any(test, feature = "mock"))]
pub use papers::{MockPaperSearch, raw_work};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
