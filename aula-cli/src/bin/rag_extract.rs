//! Extract contact details from a text file as JSON.

use std::path::PathBuf;

use anyhow::Context;
use aula_cli::{Settings, init_logging};
use aula_model::extract_contact;
use clap::Parser;

/// Extract name, email and company from a text file.
#[derive(Parser)]
#[command(name = "rag-extract", version, about)]
struct Args {
    /// UTF-8 text file to read.
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
    let contact = extract_contact(model.as_ref(), &text).await?;
    println!("{}", serde_json::to_string_pretty(&contact)?);
    Ok(())
}
