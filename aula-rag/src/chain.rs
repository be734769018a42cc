//! Retrieval-augmented answering.
//!
//! [`RagChain`] retrieves fragments from a [`KnowledgeBase`], fills a
//! [`PromptTemplate`] with them and sends the prompt to a [`ChatModel`] as a
//! single-turn request. No conversation history is involved.

use std::sync::Arc;

use aula_model::{ChatMessage, ChatModel};
use tracing::{debug, error, info};

use crate::document::SearchResult;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::prompt::PromptTemplate;

/// An answer together with the fragments it was grounded on.
#[derive(Debug, Clone)]
pub struct RagAnswer {
    /// The generated text.
    pub answer: String,
    /// The retrieved fragments, most similar first.
    pub sources: Vec<SearchResult>,
}

/// Composes retrieval, prompt templating and one completion call.
///
/// # Example
///
/// ```rust,ignore
/// use aula_rag::RagChain;
///
/// let chain = RagChain::new(knowledge_base, model);
/// let answer = chain.answer("What color is the sky?", 3).await?;
/// ```
pub struct RagChain {
    knowledge_base: Arc<KnowledgeBase>,
    model: Arc<dyn ChatModel>,
    template: PromptTemplate,
}

impl RagChain {
    /// Create a chain using [`DEFAULT_RAG_TEMPLATE`](crate::prompt::DEFAULT_RAG_TEMPLATE).
    pub fn new(knowledge_base: Arc<KnowledgeBase>, model: Arc<dyn ChatModel>) -> Self {
        Self { knowledge_base, model, template: PromptTemplate::default() }
    }

    /// Replace the prompt template.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// The knowledge base fragments are retrieved from.
    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge_base
    }

    /// Render the prompt for `question` from already retrieved `sources`.
    ///
    /// Fragment texts are joined by a blank line, so an empty `sources`
    /// yields an empty context block.
    pub fn build_prompt(&self, question: &str, sources: &[SearchResult]) -> String {
        let context =
            sources.iter().map(|result| result.record.text.as_str()).collect::<Vec<_>>().join("\n\n");
        self.template.render(&context, question)
    }

    /// Answer `question` from the `k` most similar fragments.
    ///
    /// # Errors
    ///
    /// Propagates retrieval errors and [`RagError::Model`](crate::RagError::Model)
    /// when the completion call fails.
    pub async fn answer(&self, question: &str, k: usize) -> Result<String> {
        self.answer_with_sources(question, k).await.map(|answer| answer.answer)
    }

    /// [`answer`](Self::answer) from the knowledge base's configured `top_k` fragments.
    pub async fn ask(&self, question: &str) -> Result<String> {
        self.answer(question, self.knowledge_base.config().top_k).await
    }

    /// [`answer_with_sources`](Self::answer_with_sources) with the configured `top_k`.
    pub async fn ask_with_sources(&self, question: &str) -> Result<RagAnswer> {
        self.answer_with_sources(question, self.knowledge_base.config().top_k).await
    }

    /// Like [`answer`](Self::answer) but also returns the retrieved fragments.
    pub async fn answer_with_sources(&self, question: &str, k: usize) -> Result<RagAnswer> {
        let sources = self.knowledge_base.query(question, k, None).await?;
        let prompt = self.build_prompt(question, &sources);
        debug!(sources = sources.len(), prompt_chars = prompt.chars().count(), "sending grounded prompt");

        let answer = self.model.complete(&[ChatMessage::user(prompt)]).await.inspect_err(|e| {
            error!(model = self.model.name(), error = %e, "completion failed");
        })?;

        info!(model = self.model.name(), sources = sources.len(), answer_chars = answer.len(), "answered question");
        Ok(RagAnswer { answer, sources })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::VectorRecord;
    use crate::embedding::HashingEmbedder;
    use crate::inmemory::InMemoryVectorStore;
    use aula_model::MockChatModel;

    fn result(text: &str) -> SearchResult {
        SearchResult {
            record: VectorRecord {
                id: text.into(),
                text: text.into(),
                embedding: Vec::new(),
                metadata: HashMap::new(),
                document_id: "d".into(),
                fingerprint: text.into(),
            },
            score: 1.0,
        }
    }

    fn chain() -> RagChain {
        let kb = KnowledgeBase::builder()
            .embedding_provider(Arc::new(HashingEmbedder::default()))
            .vector_store(Arc::new(InMemoryVectorStore::new()))
            .build()
            .unwrap();
        RagChain::new(Arc::new(kb), Arc::new(MockChatModel::new()))
    }

    #[test]
    fn prompt_joins_fragments_with_blank_line() {
        let chain = chain().with_template(PromptTemplate::new("{context}|{question}").unwrap());
        let prompt = chain.build_prompt("q", &[result("one"), result("two")]);
        assert_eq!(prompt, "one\n\ntwo|q");
        assert_eq!(chain.build_prompt("q", &[]), "|q");
    }
}
