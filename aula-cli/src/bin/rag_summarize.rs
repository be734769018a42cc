//! Summarize a text file in three key points.

use std::path::PathBuf;

use anyhow::Context;
use aula_cli::{Settings, init_logging};
use aula_model::summarize;
use clap::Parser;

/// Summarize a text file with the configured model.
#[derive(Parser)]
#[command(name = "rag-summarize", version, about)]
struct Args {
    /// UTF-8 text file to summarize.
    file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    init_logging();

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    let model = settings.chat_model()?;
    println!("{}", summarize(model.as_ref(), &text).await?);
    Ok(())
}
