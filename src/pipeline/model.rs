use std::fmt;

use serde::Serialize;

use crate::verify::{ComparisonResult, FactCheckResult, IndividualVerdict, RankedSource, SourceText};

/// A claim to verify, with an optional paper search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    text: String,
    query: Option<String>,
}

impl Claim {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            query: None,
        }
    }

    /// Uses `query` for paper search instead of the claim text. Blank queries are ignored.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.trim().is_empty()).then_some(query);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn search_query(&self) -> &str {
        self.query.as_deref().unwrap_or(&self.text)
    }
}

/// Pipeline stage, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RetrieveWorks,
    BuildSources,
    Verify,
    Aggregate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::RetrieveWorks => "retrieve_works",
            Stage::BuildSources => "build_sources",
            Stage::Verify => "verify",
            Stage::Aggregate => "aggregate",
        })
    }
}

/// A verdict together with the source it was aligned to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceVerdict {
    pub source_title: String,
    pub source_url: Option<String>,
    pub citations: Option<u64>,
    pub published_date: Option<String>,
    pub score: Option<f32>,
    pub source_text: String,
    #[serde(flatten)]
    pub verdict: IndividualVerdict,
}

impl SourceVerdict {
    /// Pairs a verdict with its source; a verdict without one gets `"Unknown"` provenance.
    pub fn new(verdict: IndividualVerdict, source: Option<&SourceText>) -> Self {
        match source {
            Some(source) => Self {
                source_title: source.title.clone(),
                source_url: source.url.clone(),
                citations: source.citations,
                published_date: source.published_date.clone(),
                score: source.score,
                source_text: source.text.clone(),
                verdict,
            },
            None => Self {
                source_title: "Unknown".to_string(),
                source_url: None,
                citations: None,
                published_date: None,
                score: None,
                source_text: String::new(),
                verdict,
            },
        }
    }
}

/// Outcome of one fact-check, serialized as the HTTP response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    pub original_claim: String,
    pub works_searched: usize,
    pub works_with_text: usize,
    pub snippets_used: usize,
    pub individual_results: Vec<SourceVerdict>,
    pub sorted_results: Vec<RankedSource>,
    pub consensus: Option<FactCheckResult>,
    pub final_verdict: FactCheckResult,
    pub summary: String,
    pub agreement_score: f64,
}

impl VerificationResult {
    /// Aligns verdicts to sources by position and flattens the comparison.
    pub(crate) fn assemble(
        claim: &str,
        works_searched: usize,
        works_with_text: usize,
        sources: &[SourceText],
        verdicts: Vec<IndividualVerdict>,
        comparison: ComparisonResult,
    ) -> Self {
        let individual_results = verdicts
            .into_iter()
            .enumerate()
            .map(|(i, verdict)| SourceVerdict::new(verdict, sources.get(i)))
            .collect();

        Self {
            original_claim: claim.to_string(),
            works_searched,
            works_with_text,
            snippets_used: sources.len(),
            individual_results,
            sorted_results: comparison.sorted_results,
            consensus: comparison.consensus,
            final_verdict: comparison.final_verdict,
            summary: comparison.summary,
            agreement_score: comparison.agreement_score,
        }
    }
}
