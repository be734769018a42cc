//! Property tests for fragment size and overlap.

use std::collections::HashMap;

use aula_rag::chunking::{Chunker, FixedSizeChunker, RecursiveChunker};
use aula_rag::document::Document;
use proptest::prelude::*;

fn document(text: String) -> Document {
    Document::new("doc", text, HashMap::from([("source".to_string(), "doc.txt".to_string())]))
}

/// Text drawn from words, sentence ends, line breaks and non-ASCII letters.
fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            "[a-zñá]{1,12}",
            Just(" ".to_string()),
            Just(". ".to_string()),
            Just("\n".to_string()),
            Just("\n\n".to_string()),
        ],
        0..200,
    )
    .prop_map(|parts| parts.concat())
}

fn arb_sizes() -> impl Strategy<Value = (usize, usize)> {
    (1usize..80).prop_flat_map(|size| (Just(size), 0..size))
}

fn assert_fragment_properties(
    chunker: &dyn Chunker,
    text: &str,
    size: usize,
    overlap: usize,
) -> Result<(), TestCaseError> {
    let chunks = chunker.chunk(&document(text.to_string()));
    let char_count = text.chars().count();

    if char_count == 0 {
        prop_assert!(chunks.is_empty());
        return Ok(());
    }
    if char_count <= size {
        prop_assert_eq!(chunks.len(), 1);
        prop_assert_eq!(&chunks[0].text, text);
        return Ok(());
    }

    for chunk in &chunks {
        prop_assert!(chunk.text.chars().count() <= size);
        prop_assert!(chunk.text.chars().count() > overlap);
        prop_assert_eq!(chunk.metadata.get("source").map(String::as_str), Some("doc.txt"));
    }

    // Adjacent fragments share exactly `overlap` characters, and removing
    // the shared prefixes reassembles the original text.
    let mut rebuilt: String = chunks[0].text.clone();
    for pair in chunks.windows(2) {
        let prev: Vec<char> = pair[0].text.chars().collect();
        let next: Vec<char> = pair[1].text.chars().collect();
        prop_assert_eq!(&prev[prev.len() - overlap..], &next[..overlap]);
        rebuilt.extend(&next[overlap..]);
    }
    prop_assert_eq!(rebuilt, text);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn recursive_fragments_overlap_exactly(text in arb_text(), (size, overlap) in arb_sizes()) {
        assert_fragment_properties(&RecursiveChunker::new(size, overlap), &text, size, overlap)?;
    }

    #[test]
    fn fixed_fragments_overlap_exactly(text in arb_text(), (size, overlap) in arb_sizes()) {
        assert_fragment_properties(&FixedSizeChunker::new(size, overlap), &text, size, overlap)?;
    }
}

#[test]
fn sky_and_grass_split_into_overlapping_fragments() {
    let chunks = RecursiveChunker::new(20, 5)
        .chunk(&document("The sky is blue. Grass is green.".to_string()));
    assert!(chunks.len() >= 2);
    for pair in chunks.windows(2) {
        let tail: String = pair[0].text.chars().rev().take(5).collect::<Vec<_>>().into_iter().rev().collect();
        assert!(pair[1].text.starts_with(&tail));
    }
}
