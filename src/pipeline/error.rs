use thiserror::Error;

use crate::index::IndexError;
use crate::llm::LlmError;
use crate::papers::PaperSearchError;

#[derive(Debug, Error)]
/// Reasons a fact-check fails. Decode problems never end up here.
pub enum CheckError {
    #[error("limit must be between 1 and 10, got {0}")]
    InvalidLimit(u32),

    #[error("paper search failed: {0}")]
    PaperSearch(#[from] PaperSearchError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("AI verification failed: {0}")]
    Llm(#[from] LlmError),
}
