use std::sync::Arc;
use std::time::Duration;

use super::chunk::{chunk_works, split_windows};
use super::config::IndexConfig;
use super::error::IndexError;
use super::semantic::{SemanticIndex, select_snippets};
use super::session::SessionToken;
use crate::papers::Work;
use crate::vectordb::{HitFields, MockVectorIndex, SearchHit, TextRecord};

const CLAIM: &str = "caffeine reduces sleep quality";

fn hit(id: &str, text: &str, score: f32) -> SearchHit {
    SearchHit {
        id: id.to_string(),
        score,
        fields: HitFields {
            chunk_text: text.to_string(),
            title: Some(format!("title {id}")),
            source: None,
            citations: None,
        },
    }
}

fn session_index(config: IndexConfig) -> (SemanticIndex, Arc<MockVectorIndex>) {
    let mock = Arc::new(MockVectorIndex::new());
    (SemanticIndex::new(mock.clone(), config), mock)
}

fn sleep_works() -> Vec<Work> {
    vec![
        Work::new("Paper A").with_full_text("caffeine reduces sleep quality in adults"),
        Work::new("Paper B").with_abstract("caffeine reduces sleep quality in adults"),
        Work::new("Paper C").with_full_text("bird migration patterns"),
        Work::new("Paper D"),
    ]
}

#[test]
fn test_split_windows_overlap_and_tail() {
    assert_eq!(
        split_windows("abcdefghij", 4, 1),
        vec!["abcd", "defg", "ghij"]
    );
    assert_eq!(split_windows("abcdefghijk", 4, 1), vec!["abcd", "defg", "ghij", "jk"]);
    assert_eq!(split_windows("abcd", 4, 1), vec!["abcd"]);
    assert_eq!(split_windows("ab", 4, 1), vec!["ab"]);
    assert!(split_windows("", 4, 1).is_empty());
}

#[test]
fn test_split_windows_counts_characters_not_bytes() {
    assert_eq!(split_windows("ééééé", 2, 0), vec!["éé", "éé", "é"]);
}

#[test]
fn test_chunk_works_skips_works_without_text() {
    let chunks = chunk_works(&sleep_works(), 800, 100);

    assert_eq!(chunks.len(), 3);
    assert_eq!(
        chunks.iter().map(|c| c.work_index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(chunks[1].title, "Paper B");

    let works = vec![Work::new("blank").with_full_text("   ").with_abstract("\n")];
    assert!(chunk_works(&works, 800, 100).is_empty());
}

#[test]
fn test_chunk_record_ids_carry_session_token() {
    let token = SessionToken::mint();
    let works = vec![Work::new("A").with_full_text("abcdefghij").with_citations(9)];
    let chunks = chunk_works(&works, 4, 1);

    let record = chunks[2].clone().into_record(&token);
    assert_eq!(record.id, format!("{}-w0-c2", token));
    assert_eq!(record.chunk_text, "ghij");
    assert_eq!(record.citations, Some(9));
}

#[test]
fn test_session_token_shape() {
    let a = SessionToken::mint();
    let b = SessionToken::mint();

    assert_eq!(a.as_str().len(), 8);
    assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
    assert_eq!(a.namespace("claim-session"), format!("claim-session-{a}"));
}

#[test]
fn test_index_config_validation() {
    assert!(IndexConfig::default().validate().is_ok());

    let bad = [
        IndexConfig {
            chunk_overlap: 800,
            ..IndexConfig::default()
        },
        IndexConfig {
            chunk_size: 0,
            ..IndexConfig::default()
        },
        IndexConfig {
            upsert_batch_size: 97,
            ..IndexConfig::default()
        },
        IndexConfig {
            delete_batch_size: 0,
            ..IndexConfig::default()
        },
        IndexConfig {
            min_score: 1.5,
            ..IndexConfig::default()
        },
        IndexConfig {
            rerank_factor: 4,
            ..IndexConfig::default()
        },
    ];
    for config in bad {
        assert!(config.validate().is_err(), "{config:?} should be rejected");
    }
}

#[test]
fn test_select_snippets_threshold_dedup_order() {
    let hits = vec![
        hit("low", "weak match", 0.1),
        hit("b", "same text", 0.7),
        hit("a", "best text", 0.9),
        hit("c", "same text", 0.8),
        hit("d", "another", 0.5),
    ];

    let snippets = select_snippets(hits, 0.3, 10);

    assert_eq!(
        snippets.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
        vec!["a", "c", "d"]
    );
    assert_eq!(snippets[1].title, "title c");

    let hits = vec![hit("a", "x", 0.9), hit("b", "y", 0.8), hit("c", "z", 0.7)];
    assert_eq!(select_snippets(hits, 0.0, 2).len(), 2);
}

#[tokio::test]
async fn test_session_without_usable_text_touches_nothing() {
    let (index, mock) = session_index(IndexConfig::default());
    let works = vec![Work::new("empty"), Work::new("blank").with_abstract("  ")];

    let snippets = index.run_session(CLAIM, &works, 6).await.unwrap();

    assert!(snippets.is_empty());
    assert!(mock.upsert_batches().is_empty());
    assert!(mock.searches().is_empty());
    assert!(mock.delete_batches().is_empty());
}

#[tokio::test]
async fn test_session_returns_snippets_and_cleans_up() {
    let (index, mock) = session_index(IndexConfig::default());

    let snippets = index.run_session(CLAIM, &sleep_works(), 6).await.unwrap();

    assert_eq!(snippets.len(), 1);
    assert_eq!(snippets[0].title, "Paper A");
    assert!(snippets[0].score >= 0.3);

    let searches = mock.searches();
    assert_eq!(searches.len(), 1);
    let (namespace, request) = &searches[0];
    assert!(namespace.starts_with("claim-session-"));
    assert_eq!(request.text, CLAIM);
    assert_eq!(request.top_k, 18);
    assert_eq!(request.rerank.as_ref().map(|r| r.top_n), Some(12));

    assert_eq!(mock.total_records(), 0);
    assert_eq!(mock.delete_batches(), vec![(namespace.clone(), 3)]);
}

#[tokio::test]
async fn test_sessions_use_distinct_namespaces() {
    let (index, mock) = session_index(IndexConfig::default());

    index.run_session(CLAIM, &sleep_works(), 6).await.unwrap();
    index.run_session(CLAIM, &sleep_works(), 6).await.unwrap();

    let searches = mock.searches();
    assert_ne!(searches[0].0, searches[1].0);
}

#[tokio::test]
async fn test_session_batches_writes_and_deletes() {
    let config = IndexConfig {
        chunk_size: 10,
        chunk_overlap: 0,
        delete_batch_size: 100,
        ..IndexConfig::default()
    };
    let (index, mock) = session_index(config);
    let works = vec![Work::new("long").with_full_text("word ".repeat(500))];

    index.run_session("word", &works, 6).await.unwrap();

    let upserts: Vec<usize> = mock.upsert_batches().into_iter().map(|(_, n)| n).collect();
    assert_eq!(upserts, vec![96, 96, 58]);
    let deletes: Vec<usize> = mock.delete_batches().into_iter().map(|(_, n)| n).collect();
    assert_eq!(deletes, vec![100, 100, 50]);
    assert_eq!(mock.total_records(), 0);
}

#[tokio::test]
async fn test_search_failure_still_cleans_up() {
    let (index, mock) = session_index(IndexConfig::default());
    mock.set_fail_search(true);

    let err = index.run_session(CLAIM, &sleep_works(), 6).await.unwrap_err();

    assert!(matches!(err, IndexError::Search(_)));
    assert_eq!(mock.total_records(), 0);
    assert_eq!(mock.delete_batches().len(), 1);
}

#[tokio::test]
async fn test_write_failure_deletes_attempted_ids() {
    let (index, mock) = session_index(IndexConfig::default());
    mock.set_fail_upsert(true);

    let err = index.run_session(CLAIM, &sleep_works(), 6).await.unwrap_err();

    assert!(matches!(err, IndexError::Write(_)));
    assert!(mock.searches().is_empty());
    assert_eq!(mock.delete_batches().into_iter().map(|(_, n)| n).sum::<usize>(), 3);
}

#[tokio::test]
async fn test_cleanup_failure_is_not_raised() {
    let (index, mock) = session_index(IndexConfig::default());
    mock.set_fail_delete(true);

    let snippets = index.run_session(CLAIM, &sleep_works(), 6).await.unwrap();

    assert_eq!(snippets.len(), 1);
    assert_eq!(mock.total_records(), 3);
}

#[tokio::test]
async fn test_cancelled_session_is_purged_in_background() {
    let (index, mock) = session_index(IndexConfig::default());
    mock.set_search_delay(Some(Duration::from_secs(5)));

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        index.run_session(CLAIM, &sleep_works(), 6),
    )
    .await;
    assert!(outcome.is_err(), "session should time out");

    for _ in 0..50 {
        if mock.total_records() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(mock.total_records(), 0);
    assert_eq!(mock.delete_batches().len(), 1);
}

#[tokio::test]
async fn test_cancel_during_cleanup_still_purges_everything() {
    let config = IndexConfig {
        chunk_size: 10,
        chunk_overlap: 0,
        delete_batch_size: 100,
        ..IndexConfig::default()
    };
    let (index, mock) = session_index(config);
    mock.set_delete_delay(Some(Duration::from_millis(30)));
    let works = vec![Work::new("long").with_full_text("word ".repeat(500))];

    let outcome = tokio::time::timeout(
        Duration::from_millis(45),
        index.run_session("word", &works, 6),
    )
    .await;
    assert!(outcome.is_err(), "session should time out during cleanup");
    assert!(mock.total_records() > 0);

    for _ in 0..100 {
        if mock.total_records() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(mock.total_records(), 0);
}

#[tokio::test]
async fn test_huge_top_k_saturates_request_sizes() {
    let (index, mock) = session_index(IndexConfig::default());

    let snippets = index.run_session(CLAIM, &sleep_works(), usize::MAX).await.unwrap();

    assert_eq!(snippets.len(), 1);
    let (_, request) = &mock.searches()[0];
    assert_eq!(request.top_k, usize::MAX);
    assert_eq!(request.rerank.as_ref().map(|r| r.top_n), Some(usize::MAX));
    assert_eq!(mock.total_records(), 0);
}

#[tokio::test]
async fn test_persistent_search_is_read_only_and_idempotent() {
    let (index, mock) = session_index(IndexConfig::default());
    mock.seed(
        "pdf-vault",
        vec![
            TextRecord::new("v1", "caffeine reduces sleep quality", "Vault 1"),
            TextRecord::new("v2", "caffeine and sleep", "Vault 2"),
            TextRecord::new("v3", "unrelated astronomy notes", "Vault 3"),
        ],
    );

    let first = index.search_snippets_for_claim(CLAIM, 5).await.unwrap();
    let second = index.search_snippets_for_claim(CLAIM, 5).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].id, "v1");
    assert!(mock.upsert_batches().is_empty());
    assert_eq!(mock.record_count("pdf-vault"), 3);

    let (_, request) = &mock.searches()[0];
    assert_eq!(request.top_k, 5);
    assert_eq!(request.rerank.as_ref().map(|r| r.top_n), Some(5));

    let strict = index.search_persistent(CLAIM, 5, Some(0.9)).await.unwrap();
    assert_eq!(strict.len(), 1);
}

#[tokio::test]
async fn test_persistent_search_error() {
    let (index, mock) = session_index(IndexConfig::default());
    mock.set_fail_search(true);

    let err = index.search_snippets_for_claim(CLAIM, 3).await.unwrap_err();
    assert!(matches!(err, IndexError::Persistent(_)));
}
