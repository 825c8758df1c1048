//! Text-generation backends.
//!
//! One [`TextGenerator`] per provider, chosen once by [`build_generator`] from
//! [`LlmConfig::provider`]. Prompts and decoding live in [`crate::verify`].

pub mod backend;
pub mod config;
pub mod error;
pub mod hosted;
pub mod local;
pub mod mistral;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use backend::{TextGenerator, build_generator};
pub use config::{LlmConfig, ProviderKind};
pub use error::LlmError;
pub use hosted::GenaiGenerator;
pub use local::LocalGenerator;
pub use mistral::MistralGenerator;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerator;
