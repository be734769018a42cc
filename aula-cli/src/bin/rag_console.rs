//! Interactive console over the knowledge base: load files, inspect, ask.

use std::sync::Arc;

use aula_cli::console::{ConsoleCommand, HELP};
use aula_cli::repl::{EXIT_WORD, Prompt};
use aula_cli::{Settings, format_results, init_logging};
use aula_model::APOLOGY;
use aula_rag::RagChain;
use clap::Parser;
use tracing::error;

/// Load documents and ask questions answered from them.
#[derive(Parser)]
#[command(name = "rag-console", version, about)]
struct Args {
    /// Fragments retrieved per question (defaults to RAG_TOP_K).
    #[arg(short, long)]
    k: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    init_logging();

    let kb = Arc::new(settings.knowledge_base().await?);
    let chain = RagChain::new(kb.clone(), settings.chat_model()?);
    let k = args.k.unwrap_or(kb.config().top_k);

    println!("{}", kb.stats().await?);
    println!("Type a question, ':help' for commands or '{EXIT_WORD}' to finish.");

    let mut prompt = Prompt::new()?;
    while let Some(line) = prompt.next_line("> ")? {
        match ConsoleCommand::parse(&line) {
            ConsoleCommand::Load(paths) => match kb.ingest_files(&paths).await {
                Ok(report) => {
                    for (path, e) in &report.processed.failed_files {
                        println!("Skipped {}: {e}", path.display());
                    }
                    println!(
                        "Added {} fragments from {} documents.",
                        report.added, report.processed.document_count
                    );
                }
                Err(e) => println!("Could not add the files: {e}"),
            },
            ConsoleCommand::Stats => match kb.stats().await {
                Ok(stats) => println!("{stats}"),
                Err(e) => println!("Could not read the knowledge base: {e}"),
            },
            ConsoleCommand::Clear => match kb.clear().await {
                Ok(0) => println!("The knowledge base was already empty."),
                Ok(removed) => println!("Deleted {removed} fragments."),
                Err(e) => println!("Could not clear the knowledge base: {e}"),
            },
            ConsoleCommand::Sources(question) => match chain.answer_with_sources(&question, k).await {
                Ok(answer) => {
                    println!("{}\n", answer.answer);
                    print!("{}", format_results(&answer.sources));
                }
                Err(e) => {
                    error!(error = %e, "question failed");
                    println!("{APOLOGY}");
                }
            },
            ConsoleCommand::Ask(question) => match chain.answer(&question, k).await {
                Ok(answer) => println!("{answer}"),
                Err(e) => {
                    error!(error = %e, "question failed");
                    println!("{APOLOGY}");
                }
            },
            ConsoleCommand::Help => println!("{HELP}"),
        }
    }
    println!("Goodbye!");
    Ok(())
}
