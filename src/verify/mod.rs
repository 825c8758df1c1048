//! Claim verification against source passages.
//!
//! [`VerificationClient`] sends one combined prompt to a
//! [`TextGenerator`](crate::llm::TextGenerator) and decodes the reply with
//! [`parse_verdicts`]. Malformed replies degrade to unverifiable results
//! rather than errors.

pub mod client;
pub mod decode;
pub mod model;
pub mod prompt;


pub use client::{Verdicts, VerificationClient};
pub use decode::{Decoded, ParseFailure, RawDecision, decode_reply, parse_verdicts, strip_code_fence};
pub use model::{
    ComparisonResult, DomainClassification, FactCheckResult, IndividualVerdict, RankedSource,
    SourceText,
};
