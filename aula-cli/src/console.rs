//! Command parsing for `rag-console`.

use std::path::PathBuf;

/// One line typed into the knowledge-base console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `:load <paths...>`: ingest files.
    Load(Vec<PathBuf>),
    /// `:stats`: show the fragment count.
    Stats,
    /// `:clear`: delete every fragment.
    Clear,
    /// `:sources <question>`: answer and list the fragments used.
    Sources(String),
    /// `:help`: list commands.
    Help,
    /// Anything else: a question for the RAG chain.
    Ask(String),
}

/// Help text listing the console commands.
pub const HELP: &str = "\
Commands:
  :load <file> [file...]  add .txt or .pdf files to the knowledge base
  :stats                  show how many fragments are stored
  :clear                  delete every stored fragment
  :sources <question>     answer and show the fragments used
  :help                   show this help
  salir                   leave
Anything else is answered from the knowledge base.";

impl ConsoleCommand {
    /// Parse a trimmed, non-empty input line.
    ///
    /// Unknown `:` commands and commands missing their argument yield
    /// [`ConsoleCommand::Help`].
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Ask(line.to_string());
        };
        let (command, argument) = match rest.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (rest, ""),
        };
        match (command.to_ascii_lowercase().as_str(), argument) {
            ("load", args) if !args.is_empty() => {
                Self::Load(args.split_whitespace().map(PathBuf::from).collect())
            }
            ("stats", _) => Self::Stats,
            ("clear", _) => Self::Clear,
            ("sources", question) if !question.is_empty() => Self::Sources(question.to_string()),
            _ => Self::Help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_questions() {
        assert_eq!(
            ConsoleCommand::parse(":load a.txt  docs/b.pdf"),
            ConsoleCommand::Load(vec![PathBuf::from("a.txt"), PathBuf::from("docs/b.pdf")])
        );
        assert_eq!(ConsoleCommand::parse(":STATS"), ConsoleCommand::Stats);
        assert_eq!(ConsoleCommand::parse(":clear"), ConsoleCommand::Clear);
        assert_eq!(
            ConsoleCommand::parse(":sources what is rag?"),
            ConsoleCommand::Sources("what is rag?".into())
        );
        assert_eq!(ConsoleCommand::parse("What is RAG?"), ConsoleCommand::Ask("What is RAG?".into()));
    }

    #[test]
    fn incomplete_or_unknown_commands_show_help() {
        assert_eq!(ConsoleCommand::parse(":load"), ConsoleCommand::Help);
        assert_eq!(ConsoleCommand::parse(":sources   "), ConsoleCommand::Help);
        assert_eq!(ConsoleCommand::parse(":frobnicate"), ConsoleCommand::Help);
        assert_eq!(ConsoleCommand::parse(":help"), ConsoleCommand::Help);
    }
}
