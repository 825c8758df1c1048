use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::constants::NO_SOURCES_SUMMARY;
use crate::llm::{LlmError, TextGenerator};

use super::decode::{Decoded, RawDecision, decode_as, decode_reply, parse_verdicts};
use super::model::{ComparisonResult, DomainClassification, IndividualVerdict, SourceText};
use super::prompt::{
    CLASSIFY_SYSTEM_PROMPT, VERIFY_SYSTEM_PROMPT, classification_prompt, verification_prompt,
};

/// Per-source verdicts plus the cross-source comparison.
pub type Verdicts = (Vec<IndividualVerdict>, ComparisonResult);

/// Builds prompts, calls the backend once, and decodes the reply tolerantly.
#[derive(Clone)]
pub struct VerificationClient {
    generator: Arc<dyn TextGenerator>,
}

impl VerificationClient {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn backend_name(&self) -> &'static str {
        self.generator.name()
    }

    /// One combined call judging every source and synthesizing a verdict.
    #[instrument(skip_all, fields(backend = self.generator.name(), sources = sources.len()))]
    pub async fn check_all_facts(
        &self,
        claim: &str,
        sources: &[SourceText],
    ) -> Result<RawDecision, LlmError> {
        let prompt = verification_prompt(claim, sources);
        debug!(prompt_chars = prompt.len(), "Sending verification prompt");

        let reply = self.generator.generate(VERIFY_SYSTEM_PROMPT, &prompt).await?;
        let decision = decode_reply(&reply);
        if let Decoded::Unparsed(failure) = &decision {
            warn!(reason = %failure.reason, raw_chars = failure.raw.len(), "Unparsed verification reply");
        }
        Ok(decision)
    }

    /// Verifies `claim` against `sources`; no backend call when `sources` is empty.
    pub async fn check_facts(
        &self,
        claim: &str,
        sources: &[SourceText],
    ) -> Result<Verdicts, LlmError> {
        if sources.is_empty() {
            info!("No sources to verify against");
            return Ok((Vec::new(), ComparisonResult::unverifiable(NO_SOURCES_SUMMARY)));
        }

        let decision = self.check_all_facts(claim, sources).await?;
        let (verdicts, comparison) = parse_verdicts(&decision);

        if verdicts.len() != sources.len() {
            warn!(
                verdicts = verdicts.len(),
                sources = sources.len(),
                "Verdict count differs from source count"
            );
        }
        info!(
            final_verdict = %comparison.final_verdict,
            agreement = comparison.agreement_score,
            "Verification decoded"
        );

        Ok((verdicts, comparison))
    }

    /// Asks whether the claim is health related and for likely paper titles.
    #[instrument(skip_all, fields(backend = self.generator.name()))]
    pub async fn classify_domain(
        &self,
        claim: &str,
    ) -> Result<Decoded<DomainClassification>, LlmError> {
        let reply = self
            .generator
            .generate(CLASSIFY_SYSTEM_PROMPT, &classification_prompt(claim))
            .await?;

        let decoded = decode_as::<DomainClassification>(&reply);
        if let Decoded::Unparsed(failure) = &decoded {
            warn!(reason = %failure.reason, "Unparsed classification reply");
        }
        Ok(decoded)
    }
}
