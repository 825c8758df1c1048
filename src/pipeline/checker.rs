use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::constants::{DEFAULT_SNIPPET_TOP_K, is_valid_paper_limit};
use crate::index::{SemanticIndex, Snippet};
use crate::llm::build_generator;
use crate::papers::{CoreClient, PaperQuery, PaperSearch, Work};
use crate::vectordb::VectorIndex;
use crate::verify::{Decoded, DomainClassification, SourceText, VerificationClient};

use super::config::ServiceConfig;
use super::error::CheckError;
use super::model::{Claim, Stage, VerificationResult};

/// Runs claims through paper search, an index session and one verification call.
#[derive(Clone)]
pub struct FactChecker {
    papers: Arc<dyn PaperSearch>,
    index: SemanticIndex,
    verifier: VerificationClient,
    snippet_top_k: usize,
}

impl FactChecker {
    pub fn new(papers: Arc<dyn PaperSearch>, index: SemanticIndex, verifier: VerificationClient) -> Self {
        Self {
            papers,
            index,
            verifier,
            snippet_top_k: DEFAULT_SNIPPET_TOP_K,
        }
    }

    pub fn with_snippet_top_k(mut self, top_k: usize) -> Self {
        self.snippet_top_k = top_k;
        self
    }

    /// Builds the CORE client and the configured text generator around `vector_index`.
    pub fn build(config: &ServiceConfig, vector_index: Arc<dyn VectorIndex>) -> Result<Self, CheckError> {
        let papers = Arc::new(CoreClient::new(&config.papers)?);
        let generator = build_generator(&config.llm)?;
        let index = SemanticIndex::new(vector_index, config.index.clone())
            .with_persistent_namespace(&config.pinecone.persistent_namespace)
            .with_rerank_model(&config.pinecone.rerank_model);

        Ok(Self::new(papers, index, VerificationClient::new(generator))
            .with_snippet_top_k(config.snippet_top_k))
    }

    pub fn index(&self) -> &SemanticIndex {
        &self.index
    }

    /// Full pipeline for one claim. `limit` caps the number of papers (1 to 10).
    #[instrument(skip_all, fields(limit = limit))]
    pub async fn check_claim(&self, claim: &Claim, limit: u32) -> Result<VerificationResult, CheckError> {
        if !is_valid_paper_limit(limit) {
            return Err(CheckError::InvalidLimit(limit));
        }

        let works = self
            .retrieve_works(claim, limit)
            .await
            .inspect_err(|e| log_failure(Stage::RetrieveWorks, e))?;
        let works_searched = works.len();
        let usable: Vec<Work> = works.into_iter().filter(Work::has_usable_text).collect();
        info!(
            stage = %Stage::RetrieveWorks,
            works_searched,
            works_with_text = usable.len(),
            "Works retrieved"
        );

        let sources = self
            .build_sources(claim, &usable)
            .await
            .inspect_err(|e| log_failure(Stage::BuildSources, e))?;

        let (verdicts, comparison) = self
            .verifier
            .check_facts(claim.text(), &sources)
            .await
            .map_err(CheckError::from)
            .inspect_err(|e| log_failure(Stage::Verify, e))?;

        let result = VerificationResult::assemble(
            claim.text(),
            works_searched,
            usable.len(),
            &sources,
            verdicts,
            comparison,
        );
        info!(
            stage = %Stage::Aggregate,
            final_verdict = %result.final_verdict,
            snippets_used = result.snippets_used,
            "Fact-check complete"
        );
        Ok(result)
    }

    /// Verifies against caller-supplied passages; no paper search or indexing.
    #[instrument(skip_all, fields(texts = texts.len()))]
    pub async fn check_claim_with_texts(
        &self,
        claim: &str,
        texts: Vec<SourceText>,
    ) -> Result<VerificationResult, CheckError> {
        let (verdicts, comparison) = self
            .verifier
            .check_facts(claim, &texts)
            .await
            .map_err(CheckError::from)
            .inspect_err(|e| log_failure(Stage::Verify, e))?;

        Ok(VerificationResult::assemble(
            claim,
            texts.len(),
            texts.len(),
            &texts,
            verdicts,
            comparison,
        ))
    }

    /// Domain pre-classification of a claim.
    pub async fn classify_claim(&self, claim: &str) -> Result<Decoded<DomainClassification>, CheckError> {
        Ok(self.verifier.classify_domain(claim).await?)
    }

    async fn retrieve_works(&self, claim: &Claim, limit: u32) -> Result<Vec<Work>, CheckError> {
        let query = PaperQuery::new(claim.search_query(), limit);
        let raw = self.papers.search(&query).await?;
        Ok(raw.into_iter().map(Work::from).collect())
    }

    async fn build_sources(&self, claim: &Claim, usable: &[Work]) -> Result<Vec<SourceText>, CheckError> {
        let snippets = self
            .index
            .run_session(claim.text(), usable, self.snippet_top_k)
            .await?;

        if snippets.is_empty() {
            info!(stage = %Stage::BuildSources, works = usable.len(), "No snippets, using full texts");
            Ok(usable.iter().filter_map(source_from_work).collect())
        } else {
            info!(stage = %Stage::BuildSources, snippets = snippets.len(), "Using indexed snippets");
            Ok(snippets.into_iter().map(source_from_snippet).collect())
        }
    }
}

fn source_from_snippet(snippet: Snippet) -> SourceText {
    SourceText {
        title: snippet.title,
        text: snippet.text,
        url: None,
        published_date: None,
        score: Some(snippet.score),
        citations: snippet.citations,
    }
}

fn source_from_work(work: &Work) -> Option<SourceText> {
    work.best_text().map(|text| SourceText {
        title: work.title.clone(),
        text: text.to_string(),
        url: work.download_url.clone(),
        published_date: work.published_date.clone(),
        score: None,
        citations: work.citation_count,
    })
}

fn log_failure(stage: Stage, err: &CheckError) {
    error!(stage = %stage, error = %err, "Fact-check failed");
}
