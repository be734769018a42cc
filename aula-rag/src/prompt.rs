//! Prompt template used to ground answers in retrieved fragments.

use crate::error::{RagError, Result};

const CONTEXT: &str = "{context}";
const QUESTION: &str = "{question}";

/// The default grounding prompt.
pub const DEFAULT_RAG_TEMPLATE: &str = "\
You are a friendly, expert AI assistant. Answer the user's question using ONLY the context below.

IMPORTANT INSTRUCTIONS:
- If the information is in the context, answer clearly and completely
- If the information is NOT in the context, say politely that you do not have that information
- Do NOT make up information that is not in the context
- Use bullet points or lists when they make the answer clearer

CONTEXT:
{context}

USER QUESTION:
{question}

ANSWER:
";

/// A prompt with `{context}` and `{question}` placeholders.
///
/// Rendering is single-pass: placeholder-like text inside the substituted
/// context or question is left as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template, checking that both placeholders are present.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `{context}` or `{question}` is missing.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for placeholder in [CONTEXT, QUESTION] {
            if !template.contains(placeholder) {
                return Err(RagError::Config(format!(
                    "prompt template is missing the {placeholder} placeholder"
                )));
            }
        }
        Ok(Self { template })
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Fill the placeholders with `context` and `question`.
    pub fn render(&self, context: &str, question: &str) -> String {
        let mut output = String::with_capacity(self.template.len() + context.len() + question.len());
        let mut rest = self.template.as_str();
        while let Some(pos) = rest.find('{') {
            output.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if let Some(after) = tail.strip_prefix(CONTEXT) {
                output.push_str(context);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(QUESTION) {
                output.push_str(question);
                rest = after;
            } else {
                output.push('{');
                rest = &tail[1..];
            }
        }
        output.push_str(rest);
        output
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self { template: DEFAULT_RAG_TEMPLATE.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_has_both_placeholders() {
        assert!(PromptTemplate::new(DEFAULT_RAG_TEMPLATE).is_ok());
    }

    #[test]
    fn missing_placeholder_is_config_error() {
        let err = PromptTemplate::new("Answer: {question}").unwrap_err();
        assert!(matches!(err, RagError::Config(ref m) if m.contains("{context}")));
        assert!(PromptTemplate::new("Context: {context}").is_err());
    }

    #[test]
    fn render_substitutes_once() {
        let template = PromptTemplate::new("C={context} Q={question} {other}").unwrap();
        let rendered = template.render("uses {question}", "why?");
        assert_eq!(rendered, "C=uses {question} Q=why? {other}");
    }

    #[test]
    fn empty_context_still_renders() {
        let rendered = PromptTemplate::default().render("", "What is RAG?");
        assert!(rendered.contains("CONTEXT:\n\n\nUSER QUESTION:\nWhat is RAG?"));
    }
}
