//! Property tests for in-memory vector store search ordering.

use std::collections::HashMap;

use aula_rag::document::{MetadataFilter, VectorRecord};
use aula_rag::inmemory::InMemoryVectorStore;
use aula_rag::vectorstore::VectorStore;
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

/// Generate a record with a normalized embedding and one of two sources.
fn arb_record(dim: usize) -> impl Strategy<Value = VectorRecord> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim), prop::bool::ANY).prop_map(
        |(id, text, embedding, first)| {
            let source = if first { "a.txt" } else { "b.txt" };
            VectorRecord {
                fingerprint: id.clone(),
                id,
                text,
                embedding,
                metadata: HashMap::from([("source".to_string(), source.to_string())]),
                document_id: source.to_string(),
            }
        },
    )
}

/// Search results are ordered by descending cosine similarity, bounded by
/// `top_k` and by the number of stored records.
mod prop_inmemory_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            records in proptest::collection::vec(arb_record(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async {
                let store = InMemoryVectorStore::new();
                store.insert(&records).await.unwrap();
                store.search(&query, top_k, None).await.unwrap()
            });

            prop_assert!(results.len() <= top_k);
            prop_assert_eq!(results.len(), top_k.min(records.len()));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score
                );
            }
        }

        #[test]
        fn filtered_results_only_match_filter(
            records in proptest::collection::vec(arb_record(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let filter = MetadataFilter::source("b.txt");
            let results = rt.block_on(async {
                let store = InMemoryVectorStore::new();
                store.insert(&records).await.unwrap();
                store.search(&query, records.len(), Some(&filter)).await.unwrap()
            });

            let expected = records.iter().filter(|r| r.source() == Some("b.txt")).count();
            prop_assert_eq!(results.len(), expected);
            prop_assert!(results.iter().all(|r| r.record.source() == Some("b.txt")));
        }
    }
}

#[tokio::test]
async fn empty_store_returns_no_results() {
    let store = InMemoryVectorStore::new();
    assert!(store.search(&[1.0, 0.0], 5, None).await.unwrap().is_empty());
    assert_eq!(store.count().await.unwrap(), 0);
    assert_eq!(store.clear().await.unwrap(), 0);
}

#[tokio::test]
async fn prepare_rejects_a_second_embedder_once_records_exist() {
    let store = InMemoryVectorStore::new();
    store.prepare("hashing-16", 16).await.unwrap();
    store.prepare("hashing-32", 32).await.unwrap();
    store
        .insert(&[VectorRecord {
            id: "a".into(),
            text: "alpha".into(),
            embedding: vec![0.0; 32],
            metadata: HashMap::new(),
            document_id: "a.txt".into(),
            fingerprint: "a".into(),
        }])
        .await
        .unwrap();
    store.prepare("hashing-32", 32).await.unwrap();
    assert!(store.prepare("hashing-16", 16).await.is_err());

    store.clear().await.unwrap();
    store.prepare("hashing-16", 16).await.unwrap();
}
