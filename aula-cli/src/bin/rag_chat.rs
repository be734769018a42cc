//! Interactive chatbot with a sliding history window.

use aula_cli::repl::{EXIT_WORD, Prompt};
use aula_cli::{Settings, init_logging};
use aula_model::ChatSession;
use clap::Parser;

/// Chat with the configured model.
#[derive(Parser)]
#[command(name = "rag-chat", version, about)]
struct Args {
    /// System prompt pinned at the start of the conversation.
    #[arg(long, default_value = "You are a friendly and helpful assistant.")]
    system: String,

    /// Question/answer pairs to remember (defaults to RAG_MAX_HISTORY).
    #[arg(long)]
    max_history: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env()?;
    init_logging();

    let model = settings.chat_model()?;
    let pairs = args.max_history.unwrap_or(settings.max_history);
    let mut session = ChatSession::new(model, args.system).with_max_history(pairs);

    println!("Chatbot ready ({} / {}). Type '{EXIT_WORD}' to finish.", settings.llm_provider, settings.llm_model);
    let mut prompt = Prompt::new()?;
    while let Some(line) = prompt.next_line("You: ")? {
        println!("Bot: {}", session.reply(line).await);
    }
    println!("Goodbye!");
    Ok(())
}
