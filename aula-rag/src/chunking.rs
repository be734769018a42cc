//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`RecursiveChunker`] breaks at paragraphs, then lines, then sentences, then words
//! - [`FixedSizeChunker`] cuts at exact character counts
//!
//! Both measure length in characters, never bytes, and both make consecutive
//! chunks of the same document share exactly `chunk_overlap` characters.

use crate::document::{CHUNK_INDEX_KEY, Chunk, Document};

/// Break points tried by [`RecursiveChunker`], highest priority first.
/// Each separator stays attached to the chunk before the break.
const SEPARATORS: [&str; 6] = ["\n\n", "\n", ". ", "! ", "? ", " "];

/// A strategy for splitting documents into chunks.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text, and a single
    /// chunk equal to the document if it fits within the chunk size.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;

    /// Split every document, preserving document order.
    fn chunk_all(&self, documents: &[Document]) -> Vec<Chunk> {
        documents.iter().flat_map(|document| self.chunk(document)).collect()
    }
}

/// Clamp sizes so that `1 <= chunk_size` and `chunk_overlap < chunk_size`.
fn clamp_sizes(chunk_size: usize, chunk_overlap: usize) -> (usize, usize) {
    let chunk_size = chunk_size.max(1);
    (chunk_size, chunk_overlap.min(chunk_size - 1))
}

/// Splits text hierarchically: paragraphs → lines → sentences → words → characters.
///
/// Each chunk ends at the highest-priority separator found inside the size
/// window, falling back to a hard character cut only when no separator fits.
/// The next chunk starts `chunk_overlap` characters before the previous end.
///
/// # Example
///
/// ```rust,ignore
/// use aula_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(1500, 250);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// A zero `chunk_size` is raised to 1 and `chunk_overlap` is capped at
    /// `chunk_size - 1`; use [`RagConfig`](crate::RagConfig) to reject such values instead.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let (chunk_size, chunk_overlap) = clamp_sizes(chunk_size, chunk_overlap);
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let texts = split_text(&document.text, self.chunk_size, self.chunk_overlap, &SEPARATORS);
        into_chunks(document, texts)
    }
}

/// Splits text into fixed-size character windows with configurable overlap.
///
/// # Example
///
/// ```rust,ignore
/// use aula_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(256, 50);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`, clamping sizes like [`RecursiveChunker::new`].
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let (chunk_size, chunk_overlap) = clamp_sizes(chunk_size, chunk_overlap);
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let texts = split_text(&document.text, self.chunk_size, self.chunk_overlap, &[]);
        into_chunks(document, texts)
    }
}

/// Attach ids and inherited metadata to raw chunk texts.
fn into_chunks(document: &Document, texts: Vec<String>) -> Vec<Chunk> {
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let mut metadata = document.metadata.clone();
            metadata.insert(CHUNK_INDEX_KEY.to_string(), i.to_string());
            Chunk {
                id: format!("{}_{i}", document.id),
                text,
                metadata,
                document_id: document.id.clone(),
            }
        })
        .collect()
}

/// Split `text` into windows of at most `chunk_size` characters where each
/// window after the first starts `chunk_overlap` characters before the
/// previous one ended.
///
/// Requires `chunk_overlap < chunk_size`.
fn split_text(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    if chars.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        if chars.len() - start <= chunk_size {
            chunks.push(chars[start..].iter().collect());
            break;
        }
        let limit = start + chunk_size;
        // The chunk must be longer than the overlap or the next start would not advance.
        let min_end = start + chunk_overlap + 1;
        let end = find_break(&chars, min_end, limit, separators).unwrap_or(limit);
        chunks.push(chars[start..end].iter().collect());
        start = end - chunk_overlap;
    }
    chunks
}

/// Find the last position in `min_end..=limit` that directly follows the
/// highest-priority separator present in that range.
fn find_break(chars: &[char], min_end: usize, limit: usize, separators: &[&str]) -> Option<usize> {
    separators.iter().find_map(|separator| {
        let separator: Vec<char> = separator.chars().collect();
        (min_end.max(separator.len())..=limit)
            .rev()
            .find(|&end| chars[end - separator.len()..end] == separator[..])
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn doc(text: &str) -> Document {
        Document::new(
            "notes.txt",
            text,
            HashMap::from([("source".to_string(), "notes.txt".to_string())]),
        )
    }

    #[test]
    fn short_document_yields_single_identical_chunk() {
        let chunks = RecursiveChunker::new(100, 10).chunk(&doc("Just one line."));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Just one line.");
        assert_eq!(chunks[0].id, "notes.txt_0");
        assert_eq!(chunks[0].metadata["chunk_index"], "0");
        assert_eq!(chunks[0].metadata["source"], "notes.txt");
    }

    #[test]
    fn empty_document_yields_nothing() {
        assert!(RecursiveChunker::new(10, 2).chunk(&doc("")).is_empty());
        assert!(FixedSizeChunker::new(10, 2).chunk(&doc("")).is_empty());
    }

    #[test]
    fn prefers_sentence_boundary() {
        let chunks = RecursiveChunker::new(20, 5).chunk(&doc("The sky is blue. Grass is green."));
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["The sky is blue. ", "lue. Grass is green."]);
    }

    #[test]
    fn prefers_paragraph_over_sentence() {
        let text = "First. Second.\n\nThird paragraph here.";
        let chunks = RecursiveChunker::new(24, 0).chunk(&doc(text));
        assert_eq!(chunks[0].text, "First. Second.\n\n");
        assert_eq!(chunks[1].text, "Third paragraph here.");
    }

    #[test]
    fn falls_back_to_hard_cut_without_separators() {
        let chunks = RecursiveChunker::new(4, 1).chunk(&doc("abcdefghij"));
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["abcd", "defg", "ghij"]);
    }

    #[test]
    fn fixed_size_ignores_separators() {
        let chunks = FixedSizeChunker::new(5, 2).chunk(&doc("ab cd ef gh"));
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["ab cd", "cd ef", "ef gh"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let chunks = RecursiveChunker::new(6, 2).chunk(&doc("ñandú árbol"));
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 6));
        let joined: String = chunks[0].text.chars().chain(chunks[1].text.chars().skip(2)).collect();
        assert!(joined.starts_with("ñandú "));
    }

    #[test]
    fn chunk_all_keeps_document_order() {
        let docs = [doc("one"), Document::new("b", "two", HashMap::new())];
        let chunks = RecursiveChunker::new(10, 0).chunk_all(&docs);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].document_id, "b");
    }

    #[test]
    fn sizes_are_clamped() {
        let chunks = FixedSizeChunker::new(0, 5).chunk(&doc("abc"));
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }
}
