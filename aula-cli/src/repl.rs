//! Line editor loop shared by the interactive binaries.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// The word that ends an interactive session.
pub const EXIT_WORD: &str = "salir";

/// Whether `line` asks to leave the session. Case-insensitive.
pub fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(EXIT_WORD)
}

/// A readline prompt with in-memory history.
pub struct Prompt {
    editor: DefaultEditor,
}

impl Prompt {
    /// Create a prompt attached to the terminal.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self { editor: DefaultEditor::new()? })
    }

    /// Read the next non-blank line.
    ///
    /// Returns `None` when the user types the exit word, presses Ctrl-C or
    /// closes the input.
    pub fn next_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if is_exit(line) {
                        return Ok(None);
                    }
                    let _ = self.editor.add_history_entry(line);
                    return Ok(Some(line.to_string()));
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_word_is_case_insensitive() {
        assert!(is_exit("salir"));
        assert!(is_exit("  SALIR "));
        assert!(!is_exit("salir ahora"));
        assert!(!is_exit("exit"));
    }
}
