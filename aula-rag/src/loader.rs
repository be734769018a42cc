//! Loading `.txt` and `.pdf` files into [`Document`]s.
//!
//! Text files become one document each and must be valid UTF-8. PDF files
//! become one document per non-blank page, extracted with `pdf-extract`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::chunking::Chunker;
use crate::document::{Chunk, Document, PAGE_KEY, SOURCE_KEY};
use crate::error::{RagError, Result};

/// File formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Plain UTF-8 text (`.txt`).
    Text,
    /// Portable Document Format (`.pdf`).
    Pdf,
}

impl DocumentFormat {
    /// Detect the format from the file extension, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("txt") => Ok(Self::Text),
            Some("pdf") => Ok(Self::Pdf),
            _ => Err(RagError::UnsupportedFormat { path: path.to_path_buf() }),
        }
    }
}

/// Load one file into documents.
///
/// # Errors
///
/// - [`RagError::UnsupportedFormat`] if the extension is not `.txt` or `.pdf`
/// - [`RagError::Io`] if the file cannot be read, is not valid UTF-8, or is not a readable PDF
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    match DocumentFormat::from_path(path)? {
        DocumentFormat::Text => load_text(path).map(|document| vec![document]),
        DocumentFormat::Pdf => load_pdf(path),
    }
}

fn source_metadata(path: &Path) -> HashMap<String, String> {
    HashMap::from([(SOURCE_KEY.to_string(), path.display().to_string())])
}

fn io_error(path: &Path, message: impl Into<String>) -> RagError {
    RagError::Io { path: path.to_path_buf(), message: message.into() }
}

fn load_text(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path).map_err(|e| io_error(path, e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| io_error(path, format!("invalid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text);
    Ok(Document::new(path.display().to_string(), text, source_metadata(path)))
}

fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| io_error(path, format!("failed to extract PDF text: {e}")))?;
    Ok(pdf_pages(path, &text))
}

/// Split extracted PDF text on form feeds into one document per non-blank page.
fn pdf_pages(path: &Path, text: &str) -> Vec<Document> {
    text.split('\x0c')
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(page, content)| {
            let mut metadata = source_metadata(path);
            metadata.insert(PAGE_KEY.to_string(), page.to_string());
            Document::new(format!("{}#page={page}", path.display()), content, metadata)
        })
        .collect()
}

/// The outcome of loading several files.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Documents from every file that loaded.
    pub documents: Vec<Document>,
    /// Files that failed, with the reason.
    pub failed_files: Vec<(PathBuf, RagError)>,
}

/// Load every file, recording failures instead of stopping at the first one.
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> LoadReport {
    let mut report = LoadReport::default();
    for path in paths {
        let path = path.as_ref();
        match load_file(path) {
            Ok(documents) => {
                info!(path = %path.display(), documents = documents.len(), "loaded file");
                report.documents.extend(documents);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load file");
                report.failed_files.push((path.to_path_buf(), e));
            }
        }
    }
    report
}

/// The outcome of loading and splitting several files.
#[derive(Debug)]
pub struct ProcessReport {
    /// Fragments from every loaded document, in file order.
    pub chunks: Vec<Chunk>,
    /// Number of documents that were loaded.
    pub document_count: usize,
    /// Files that failed to load, with the reason.
    pub failed_files: Vec<(PathBuf, RagError)>,
}

/// Load every file and split the resulting documents with `chunker`.
///
/// # Errors
///
/// - [`RagError::NoDocuments`] if no file produced a document
/// - [`RagError::NoChunks`] if every document was empty
pub fn process_files<P: AsRef<Path>>(paths: &[P], chunker: &dyn Chunker) -> Result<ProcessReport> {
    let LoadReport { documents, failed_files } = load_files(paths);
    if documents.is_empty() {
        return Err(RagError::NoDocuments);
    }

    let chunks = chunker.chunk_all(&documents);
    if chunks.is_empty() {
        return Err(RagError::NoChunks);
    }

    info!(documents = documents.len(), chunks = chunks.len(), failed = failed_files.len(), "processed files");
    Ok(ProcessReport { chunks, document_count: documents.len(), failed_files })
}
