//! Load `.txt` and `.pdf` files, split them and add them to the knowledge base.

use std::path::PathBuf;

use aula_cli::{Settings, init_logging};
use clap::Parser;

/// Add documents to the persisted knowledge base.
#[derive(Parser)]
#[command(name = "rag-ingest", version, about)]
struct Args {
    /// Files to ingest (.txt or .pdf).
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    init_logging();

    let kb = settings.knowledge_base().await?;
    let report = kb.ingest_files(&args.files).await?;

    for (path, error) in &report.processed.failed_files {
        eprintln!("Skipped {}: {error}", path.display());
    }
    println!(
        "Loaded {} documents, split into {} fragments, added {}.",
        report.processed.document_count,
        report.processed.chunks.len(),
        report.added
    );
    println!("{}", kb.stats().await?);
    Ok(())
}
