//! End-to-end pipeline tests against in-memory collaborators.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use claimcheck::gateway::{AppState, create_router_with_state};
use claimcheck::index::split_windows;
use claimcheck::{
    Claim, FactCheckResult, FactChecker, IndexConfig, MockGenerator, MockPaperSearch,
    MockVectorIndex, SemanticIndex, SourceText, VerificationClient, Work, raw_work,
};

const CLAIM: &str = "Regular exercise lowers resting blood pressure";

fn verbatim_reply() -> String {
    json!({
        "individual_results": [{
            "source": "Hypertension trial",
            "is_verified": true,
            "confidence": 0.95,
            "result": "verified",
            "explanation": "The source states the claim directly.",
            "supporting_evidence": [CLAIM],
            "contradicting_evidence": []
        }],
        "sorted_results": [{
            "source": "Hypertension trial",
            "confidence": 0.95,
            "result": "verified",
            "key_evidence": CLAIM
        }],
        "consensus": "verified",
        "final_verdict": "verified",
        "summary": "The only source supports the claim.",
        "agreement_score": 1.0
    })
    .to_string()
}

fn checker(
    papers: MockPaperSearch,
    reply: String,
) -> (FactChecker, Arc<MockVectorIndex>, Arc<MockGenerator>) {
    let vectors = Arc::new(MockVectorIndex::new());
    let generator = Arc::new(MockGenerator::with_reply(reply));
    let checker = FactChecker::new(
        Arc::new(papers),
        SemanticIndex::new(vectors.clone(), IndexConfig::default()),
        VerificationClient::new(generator.clone()),
    );
    (checker, vectors, generator)
}

#[tokio::test]
async fn test_no_sources_is_unverifiable() {
    let (checker, _, generator) = checker(MockPaperSearch::new(), verbatim_reply());

    let result = checker
        .check_claim_with_texts("Vaccines cause autism", Vec::new())
        .await
        .unwrap();

    assert_eq!(result.final_verdict, FactCheckResult::Unverifiable);
    assert_eq!(result.summary, "No source texts provided.");
    assert_eq!(result.agreement_score, 0.0);
    assert!(result.individual_results.is_empty());
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_verbatim_source_is_verified_with_high_confidence() {
    let (checker, _, generator) = checker(MockPaperSearch::new(), verbatim_reply());
    let sources = vec![SourceText::new("Hypertension trial", CLAIM)];

    let result = checker.check_claim_with_texts(CLAIM, sources).await.unwrap();

    let verdict = &result.individual_results[0];
    assert!(verdict.verdict.is_verified);
    assert_eq!(verdict.verdict.result, FactCheckResult::Verified);
    assert!(verdict.verdict.confidence > 0.8);
    assert_eq!(verdict.source_title, "Hypertension trial");
    assert_eq!(result.sorted_results.len(), 1);

    let (_, prompt) = &generator.prompts()[0];
    assert!(prompt.contains("Source 1 - Hypertension trial:"));
    assert!(prompt.contains(CLAIM));
}

#[test]
fn test_default_windows_reconstruct_text() {
    let text: String = (0..2000)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();

    let windows = split_windows(&text, 800, 100);

    assert!(windows.len() >= 3);
    let mut rebuilt = windows[0].to_string();
    for pair in windows.windows(2) {
        assert_eq!(&pair[0][pair[0].len() - 100..], &pair[1][..100]);
        rebuilt.push_str(&pair[1][100..]);
    }
    assert_eq!(rebuilt, text);
}

#[tokio::test]
async fn test_search_pipeline_leaves_index_clean() {
    let papers = MockPaperSearch::with_works(vec![
        raw_work("Hypertension trial", Some(CLAIM), None),
        raw_work("Unrelated", None, Some("deep sea fauna survey")),
    ]);
    let (checker, vectors, generator) = checker(papers, verbatim_reply());

    let result = checker.check_claim(&Claim::new(CLAIM), 2).await.unwrap();

    assert_eq!(result.works_searched, 2);
    assert_eq!(result.works_with_text, 2);
    assert_eq!(result.final_verdict, FactCheckResult::Verified);
    assert_eq!(result.individual_results[0].source_title, "Hypertension trial");
    assert_eq!(generator.call_count(), 1);
    assert_eq!(vectors.total_records(), 0);
    assert!(vectors.live_namespaces().is_empty());
}

#[tokio::test]
async fn test_concurrent_sessions_are_isolated() {
    let vectors = Arc::new(MockVectorIndex::new());
    let index = SemanticIndex::new(vectors.clone(), IndexConfig::default());
    let works = vec![
        Work::new("A").with_full_text(CLAIM),
        Work::new("B").with_abstract("exercise and blood pressure in adults"),
    ];

    let (first, second) = tokio::join!(
        index.run_session(CLAIM, &works, 4),
        index.run_session(CLAIM, &works, 4),
    );

    let texts = |snippets: Vec<claimcheck::Snippet>| -> Vec<String> {
        snippets.into_iter().map(|s| s.text).collect()
    };
    assert_eq!(texts(first.unwrap()), texts(second.unwrap()));
    let searches = vectors.searches();
    assert_eq!(searches.len(), 2);
    assert_ne!(searches[0].0, searches[1].0);
    assert_eq!(vectors.total_records(), 0);
}

#[tokio::test]
async fn test_failed_backend_still_cleans_index() {
    let papers = MockPaperSearch::with_works(vec![raw_work("Trial", Some(CLAIM), None)]);
    let (checker, vectors, generator) = checker(papers, verbatim_reply());
    generator.set_fail(true);

    assert!(checker.check_claim(&Claim::new(CLAIM), 1).await.is_err());
    assert_eq!(vectors.total_records(), 0);
}

#[tokio::test]
async fn test_fenced_reply_is_decoded() {
    let fenced = format!("```json\n{}\n```", verbatim_reply());
    let (checker, _, _) = checker(MockPaperSearch::new(), fenced);

    let result = checker
        .check_claim_with_texts(CLAIM, vec![SourceText::new("Hypertension trial", CLAIM)])
        .await
        .unwrap();

    assert_eq!(result.final_verdict, FactCheckResult::Verified);
}

#[tokio::test]
async fn test_http_search_route_end_to_end() {
    let papers = MockPaperSearch::with_works(vec![raw_work("Hypertension trial", Some(CLAIM), None)]);
    let (checker, vectors, _) = checker(papers, verbatim_reply());
    let app = create_router_with_state(AppState::new(Arc::new(checker)));

    let request = Request::builder()
        .method("POST")
        .uri("/fact-check/search")
        .header("content-type", "application/json")
        .body(Body::from(json!({"claim": CLAIM, "limit": 1}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["final_verdict"], "verified");
    assert_eq!(body["individual_results"][0]["is_verified"], true);
    assert!(body["individual_results"][0]["score"].is_number());
    assert_eq!(vectors.total_records(), 0);
}
