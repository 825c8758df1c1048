//! Claim verification pipeline.
//!
//! `RETRIEVE_WORKS -> BUILD_SOURCES -> VERIFY -> AGGREGATE`. Any collaborator
//! error ends the run with a [`CheckError`]; malformed model output does not.

pub mod checker;
pub mod config;
pub mod error;
pub mod model;


pub use checker::FactChecker;
pub use config::ServiceConfig;
pub use error::CheckError;
pub use model::{Claim, SourceVerdict, Stage, VerificationResult};
