use super::client::{VectorIndex, normalize_host};
use super::config::PineconeConfig;
use super::error::VectorDbError;
use super::mock::{MockVectorIndex, text_similarity};
use super::model::{HitFields, RerankSpec, SearchHit, SearchRequest, TextRecord};

const TEST_NAMESPACE: &str = "test-namespace";

fn record(id: &str, text: &str) -> TextRecord {
    TextRecord::new(id, text, format!("Paper {id}"))
}

#[test]
fn test_record_serializes_with_underscore_id() {
    let json = serde_json::to_value(record("a-w0-c0", "coffee and sleep")).unwrap();

    assert_eq!(json["_id"], "a-w0-c0");
    assert_eq!(json["chunk_text"], "coffee and sleep");
    assert_eq!(json["title"], "Paper a-w0-c0");
    assert!(json.get("citations").is_none());

    let json = serde_json::to_value(record("x", "t").with_citations(Some(42))).unwrap();
    assert_eq!(json["citations"], 42);
}

#[test]
fn test_rerank_spec_targets_chunk_text() {
    let spec = RerankSpec::on_chunk_text("bge-reranker-v2-m3", 6);
    let json = serde_json::to_value(&spec).unwrap();

    assert_eq!(json["model"], "bge-reranker-v2-m3");
    assert_eq!(json["top_n"], 6);
    assert_eq!(json["rank_fields"], serde_json::json!(["chunk_text"]));
}

#[test]
fn test_search_hit_decodes_provider_shape() {
    let hit: SearchHit = serde_json::from_value(serde_json::json!({
        "_id": "abc-w1-c3",
        "_score": 0.82,
        "fields": {"chunk_text": "some text", "source": "vault.pdf"}
    }))
    .unwrap();

    assert_eq!(hit.id, "abc-w1-c3");
    assert!((hit.score - 0.82).abs() < 1e-6);
    assert_eq!(hit.fields.display_title(), "vault.pdf");
}

#[test]
fn test_search_hit_tolerates_missing_fields() {
    let hit: SearchHit = serde_json::from_value(serde_json::json!({"_id": "x"})).unwrap();

    assert_eq!(hit.score, 0.0);
    assert_eq!(hit.fields, HitFields::default());
    assert_eq!(hit.fields.display_title(), "Unknown");
}

#[test]
fn test_normalize_host() {
    assert_eq!(
        normalize_host("fact-checker-abc.svc.pinecone.io"),
        "https://fact-checker-abc.svc.pinecone.io"
    );
    assert_eq!(normalize_host("http://localhost:5080/"), "http://localhost:5080");
}

#[test]
fn test_config_requires_api_key() {
    let config = PineconeConfig::default();
    assert!(config.validate().is_err());

    let config = PineconeConfig {
        api_key: "pc-key".to_string(),
        ..PineconeConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_text_similarity_bounds() {
    assert_eq!(text_similarity("", "anything"), 0.0);
    assert!((text_similarity("Coffee improves sleep", "coffee IMPROVES sleep") - 1.0).abs() < 1e-6);

    let partial = text_similarity("coffee improves sleep", "coffee harms memory");
    assert!(partial > 0.0 && partial < 1.0);
}

#[tokio::test]
async fn test_mock_upsert_and_search_ranks_by_overlap() {
    let index = MockVectorIndex::new();
    index
        .upsert_records(
            TEST_NAMESPACE,
            vec![
                record("a", "caffeine intake reduces sleep quality"),
                record("b", "unrelated study of bird migration"),
                record("c", "caffeine and sleep"),
            ],
        )
        .await
        .expect("upsert should succeed");

    let hits = index
        .search_records(TEST_NAMESPACE, &SearchRequest::new("caffeine sleep", 10))
        .await
        .expect("search should succeed");

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].id, "c");
    assert_eq!(hits[1].id, "a");
    assert_eq!(hits[2].score, 0.0);
    assert_eq!(index.upsert_batches(), vec![(TEST_NAMESPACE.to_string(), 3)]);
}

#[tokio::test]
async fn test_mock_rerank_truncates_to_top_n() {
    let index = MockVectorIndex::new();
    index.seed(
        TEST_NAMESPACE,
        (0..5).map(|i| record(&format!("r{i}"), "shared words")).collect(),
    );

    let request =
        SearchRequest::new("shared words", 5).with_rerank(RerankSpec::on_chunk_text("m", 2));
    let hits = index.search_records(TEST_NAMESPACE, &request).await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "r0");
    assert_eq!(hits[1].id, "r1");
}

#[tokio::test]
async fn test_mock_search_unknown_namespace_is_empty() {
    let index = MockVectorIndex::new();
    let hits = index
        .search_records("missing", &SearchRequest::new("anything", 3))
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_mock_delete_removes_only_listed_ids() {
    let index = MockVectorIndex::new();
    index.seed(TEST_NAMESPACE, vec![record("a", "x"), record("b", "y")]);

    index
        .delete_records(TEST_NAMESPACE, vec!["a".to_string(), "ghost".to_string()])
        .await
        .unwrap();

    assert_eq!(index.record_count(TEST_NAMESPACE), 1);
    assert_eq!(index.delete_batches(), vec![(TEST_NAMESPACE.to_string(), 2)]);
}

#[tokio::test]
async fn test_mock_failure_injection() {
    let index = MockVectorIndex::new();

    index.set_fail_search(true);
    let err = index
        .search_records(TEST_NAMESPACE, &SearchRequest::new("q", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, VectorDbError::SearchFailed { .. }));

    index.seed(TEST_NAMESPACE, vec![record("a", "x")]);
    index.set_fail_delete(true);
    let err = index
        .delete_records(TEST_NAMESPACE, vec!["a".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, VectorDbError::DeleteFailed { .. }));
    assert_eq!(index.record_count(TEST_NAMESPACE), 1);

    index.set_fail_upsert(true);
    let err = index
        .upsert_records(TEST_NAMESPACE, vec![record("b", "y")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains(TEST_NAMESPACE));
}
