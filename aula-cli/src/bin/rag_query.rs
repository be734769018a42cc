//! Print the fragments most similar to a query.

use aula_cli::{Settings, format_results, init_logging};
use clap::Parser;

/// Search the knowledge base.
#[derive(Parser)]
#[command(name = "rag-query", version, about)]
struct Args {
    /// Query words; they are joined with spaces.
    #[arg(required = true)]
    query: Vec<String>,

    /// Number of fragments to return.
    #[arg(short, long, default_value_t = 3)]
    k: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    init_logging();

    let query = args.query.join(" ");
    let kb = settings.knowledge_base().await?;
    println!("Searching for: '{query}'\n");
    let results = kb.query(&query, args.k, None).await?;
    print!("{}", format_results(&results));
    Ok(())
}
