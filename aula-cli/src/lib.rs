//! # aula-cli
//!
//! Shared plumbing for the `rag-*` binaries: [`Settings`] from the
//! environment, logging setup, the interactive prompt and result formatting.

pub mod console;
pub mod repl;
pub mod settings;
pub mod telemetry;

use std::fmt::Write as _;

use aula_rag::SearchResult;

pub use settings::{EmbedderKind, LlmProvider, Settings};
pub use telemetry::init_logging;

/// Printed when a search finds nothing.
pub const NO_RESULTS: &str = "No relevant results were found.";

/// Render search results with their source, page and content.
pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("{NO_RESULTS}\n");
    }

    let rule = "-".repeat(30);
    let mut out = format!("Results:\n{}\n", "=".repeat(30));
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(out, "Result {} (score {:.3}):", i + 1, result.score);
        let _ = writeln!(out, "Source: {}", result.record.source().unwrap_or("N/A"));
        let _ = writeln!(out, "Page: {}", result.record.page().unwrap_or("N/A"));
        let _ = writeln!(out, "Content:\n{}", result.record.text);
        let _ = writeln!(out, "{rule}");
    }
    out
}
