use std::fmt::Write;

use super::model::SourceText;

pub const VERIFY_SYSTEM_PROMPT: &str = "You are a scientific fact-checking assistant.\n\
Assess claims against the supplied source texts and respond ONLY with valid JSON. No extra text.";

pub const CLASSIFY_SYSTEM_PROMPT: &str = "You are a critical classifier.";

const VERIFY_SCHEMA: &str = r#"{
    "individual_results": [
        {
            "source": "Source title",
            "is_verified": true/false,
            "confidence": 0.0-1.0,
            "result": "verified" or "partially_verified" or "false" or "unverifiable" or "conflicting",
            "explanation": "Explanation based on this source",
            "supporting_evidence": ["passages that support the claim"],
            "contradicting_evidence": ["passages that contradict the claim"]
        }
    ],
    "sorted_results": [
        {
            "source": "Source title",
            "confidence": 0.0-1.0,
            "result": "verified" or "partially_verified" or "false" or "unverifiable",
            "key_evidence": "Most important evidence from this source"
        }
    ],
    "consensus": "verified" or "partially_verified" or "false" or "unverifiable" or "conflicting" or null,
    "final_verdict": "verified" or "partially_verified" or "false" or "unverifiable" or "conflicting",
    "summary": "Brief summary of findings across all sources",
    "agreement_score": 0.0-1.0
}"#;

const CLASSIFY_SCHEMA: &str = r#"{
    "is_health_related": "(true|false)",
    "justification": "(one or two sentences explaining why)",
    "scientific paper names suggestions": [
        "first scientific paper title",
        "second scientific paper title",
        "third scientific paper title"
    ]
}"#;

/// Renders sources as `Source {i} - {title}:` blocks, numbered from 1.
pub fn format_sources(sources: &[SourceText]) -> String {
    let mut out = String::new();
    for (i, source) in sources.iter().enumerate() {
        let _ = write!(out, "\nSource {} - {}:\n{}\n", i + 1, source.title, source.text);
    }
    out
}

/// User prompt for the combined verification call.
pub fn verification_prompt(claim: &str, sources: &[SourceText]) -> String {
    format!(
        "Claim to verify: \"{claim}\"\n\n\
         Sources:\n{sources}\n\n\
         Respond ONLY with this JSON structure, one individual_results entry per source in the order given:\n\
         {VERIFY_SCHEMA}\n\n\
         sorted_results must be sorted by confidence (highest first).",
        sources = format_sources(sources),
    )
}

/// User prompt for the domain pre-classification call.
pub fn classification_prompt(claim: &str) -> String {
    format!(
        "Classify whether this claim is related to health or not; the answer decides whether it \
         goes through health fact-checking. Strictly return JSON:\n{CLASSIFY_SCHEMA}\n\
         The claim to classify: {claim}\n"
    )
}
