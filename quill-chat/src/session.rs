//! One chat session: a loaded document, its index, and the conversation.

use quill_context::TextSplitter;
use quill_embed::EmbeddingProvider;
use quill_retriever::{RetrieverError, SearchHit, VectorIndex};
use std::sync::Arc;

use crate::backends::{BackendError, CompletionBackend};

/// Instructions given to every backend for grounded answering.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions based on the \
    provided context from a Markdown document. Always base your answers on the context provided. \
    If the answer cannot be found in the context, say so clearly. Be concise but thorough in your \
    responses.";

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced by a chat session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Chunking produced no chunks (blank document) or indexing failed
    #[error(transparent)]
    Retrieval(#[from] RetrieverError),

    /// The completion backend failed
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Who said a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation history.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The outcome of one question: the answer plus the chunks it was grounded on.
#[derive(Debug)]
pub struct ChatTurn {
    pub answer: String,
    pub retrieved: Vec<SearchHit>,
}

/// A document-grounded chat session.
///
/// The session owns the retrieval state for exactly one document at a time.
/// Loading a new document rebuilds the index and clears the conversation, so
/// history never refers to chunks that are no longer retrievable.
pub struct ChatSession {
    provider: Arc<dyn EmbeddingProvider>,
    splitter: TextSplitter,
    top_k: usize,
    index: Option<VectorIndex>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Create a session with no document loaded.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, splitter: TextSplitter, top_k: usize) -> Self {
        Self {
            provider,
            splitter,
            top_k,
            index: None,
            messages: Vec::new(),
        }
    }

    /// Split `content`, embed the chunks, and build the session index.
    ///
    /// Replaces any previously loaded document wholesale and clears the
    /// conversation history. A failed load leaves the previous document and
    /// history intact. Returns the number of indexed chunks.
    pub async fn load_document(&mut self, content: &str) -> Result<usize> {
        let chunks = self.splitter.split(content);
        let texts: Vec<String> = chunks.into_iter().map(|c| c.text).collect();

        let index = VectorIndex::new(self.provider.clone());
        index.build(texts).await?;

        let chunk_count = index.chunk_count();
        tracing::info!(chunks = chunk_count, "document loaded");

        self.index = Some(index);
        self.messages.clear();
        Ok(chunk_count)
    }

    /// Answer `question` using the loaded document and the given backend.
    ///
    /// Retrieves the top-K closest chunks, joins them into a context block,
    /// and asks the backend to complete. The question and answer are appended
    /// to the conversation history on success.
    pub async fn ask(
        &mut self,
        backend: &dyn CompletionBackend,
        question: &str,
    ) -> Result<ChatTurn> {
        let retrieved = match &self.index {
            Some(index) => index.search(question, self.top_k).await?,
            None => Vec::new(),
        };

        let context = retrieved
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        let answer = backend.complete(SYSTEM_PROMPT, &context, question).await?;

        self.messages.push(ChatMessage {
            role: Role::User,
            content: question.to_string(),
        });
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: answer.clone(),
        });

        Ok(ChatTurn { answer, retrieved })
    }

    /// Forget the conversation, keeping the loaded document.
    pub fn clear_history(&mut self) {
        self.messages.clear();
    }

    /// Whether a document is loaded and indexed.
    pub fn has_document(&self) -> bool {
        self.index.is_some()
    }

    /// Number of chunks in the current index, 0 without a document.
    pub fn chunk_count(&self) -> usize {
        self.index.as_ref().map(|i| i.chunk_count()).unwrap_or(0)
    }

    /// The conversation so far.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use half::f16;
    use quill_embed::{EmbeddingResult, Result as EmbedResult};
    use std::sync::Mutex;

    /// Embeds any text to a vector of its length, so distinct texts separate.
    struct LengthProvider;

    #[async_trait]
    impl EmbeddingProvider for LengthProvider {
        async fn embed_text(&self, text: &str) -> EmbedResult<Vec<f16>> {
            Ok(vec![f16::from_f32(text.len() as f32)])
        }

        async fn embed_texts(&self, texts: &[String]) -> EmbedResult<EmbeddingResult> {
            Ok(EmbeddingResult::new(
                texts
                    .iter()
                    .map(|t| vec![f16::from_f32(t.len() as f32)])
                    .collect(),
            ))
        }

        fn embedding_dimension(&self) -> usize {
            1
        }

        fn provider_name(&self) -> &str {
            "length"
        }
    }

    /// Records the context it was handed and returns a canned answer.
    struct RecordingBackend {
        contexts: Mutex<Vec<String>>,
    }

    impl RecordingBackend {
        fn new() -> Self {
            Self {
                contexts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for RecordingBackend {
        async fn complete(
            &self,
            _system_prompt: &str,
            context: &str,
            _question: &str,
        ) -> crate::backends::Result<String> {
            self.contexts.lock().unwrap().push(context.to_string());
            Ok("canned answer".to_string())
        }

        fn backend_name(&self) -> &str {
            "recording"
        }
    }

    fn session() -> ChatSession {
        ChatSession::new(Arc::new(LengthProvider), TextSplitter::new(500, 50), 3)
    }

    #[tokio::test]
    async fn test_load_document_reports_chunk_count() {
        let mut session = session();
        let count = session
            .load_document("First paragraph.\n\nSecond paragraph.")
            .await
            .unwrap();
        assert_eq!(count, 1); // both paragraphs fit one chunk
        assert!(session.has_document());
        assert_eq!(session.chunk_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_document_fails_and_keeps_previous() {
        let mut session = session();
        session.load_document("Some real content.").await.unwrap();

        let err = session.load_document("   \n\n  ").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Retrieval(RetrieverError::EmptyCorpus)
        ));

        // Previous document still loaded
        assert!(session.has_document());
        assert_eq!(session.chunk_count(), 1);
    }

    #[tokio::test]
    async fn test_ask_builds_context_and_records_history() {
        let mut session = session();
        session.load_document("Only paragraph here.").await.unwrap();

        let backend = RecordingBackend::new();
        let turn = session.ask(&backend, "what is here?").await.unwrap();

        assert_eq!(turn.answer, "canned answer");
        assert_eq!(turn.retrieved.len(), 1);
        assert_eq!(turn.retrieved[0].text, "Only paragraph here.");

        let contexts = backend.contexts.lock().unwrap();
        assert_eq!(contexts[0], "Only paragraph here.");

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "what is here?");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "canned answer");
    }

    #[tokio::test]
    async fn test_context_joins_chunks_with_separator() {
        let long_a = "alpha ".repeat(60); // ~360 chars
        let long_b = "beta ".repeat(60); // ~300 chars
        let document = format!("{}\n\n{}", long_a.trim(), long_b.trim());

        let mut session = session();
        let count = session.load_document(&document).await.unwrap();
        assert_eq!(count, 2);

        let backend = RecordingBackend::new();
        session.ask(&backend, "question").await.unwrap();

        let contexts = backend.contexts.lock().unwrap();
        assert!(contexts[0].contains("\n\n---\n\n"));
    }

    #[tokio::test]
    async fn test_ask_without_document_sends_empty_context() {
        let mut session = session();
        let backend = RecordingBackend::new();

        let turn = session.ask(&backend, "anything?").await.unwrap();
        assert!(turn.retrieved.is_empty());
        assert_eq!(backend.contexts.lock().unwrap()[0], "");
    }

    #[tokio::test]
    async fn test_new_document_clears_history() {
        let mut session = session();
        session.load_document("First document.").await.unwrap();

        let backend = RecordingBackend::new();
        session.ask(&backend, "question").await.unwrap();
        assert_eq!(session.messages().len(), 2);

        session.load_document("Second document.").await.unwrap();
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_clear_history_keeps_document() {
        let mut session = session();
        session.load_document("A document.").await.unwrap();

        let backend = RecordingBackend::new();
        session.ask(&backend, "question").await.unwrap();

        session.clear_history();
        assert!(session.messages().is_empty());
        assert!(session.has_document());
    }
}
