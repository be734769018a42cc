//! Print the fragments most similar to a query, optionally from one source only.

use aula_cli::{Settings, format_results, init_logging};
use aula_rag::MetadataFilter;
use clap::Parser;

/// Search the knowledge base, restricted to one source file.
#[derive(Parser)]
#[command(name = "rag-query-filtered", version, about)]
struct Args {
    /// The query text.
    query: String,

    /// Only return fragments whose source equals this path.
    source: Option<String>,

    /// Number of fragments to return.
    #[arg(short, long, default_value_t = 3)]
    k: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    init_logging();

    let kb = settings.knowledge_base().await?;
    let filter = args.source.as_deref().map(MetadataFilter::source);
    match &args.source {
        Some(source) => println!("Searching for: '{}' in {source}\n", args.query),
        None => println!("Searching for: '{}'\n", args.query),
    }
    let results = kb.query(&args.query, args.k, filter.as_ref()).await?;
    print!("{}", format_results(&results));
    Ok(())
}
