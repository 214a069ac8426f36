//! # quill-chat
//!
//! Document-grounded chat: the orchestration layer that ties the quill
//! retrieval core to pluggable LLM completion backends.
//!
//! A [`ChatSession`] loads one Markdown document at a time, chunks it with
//! `quill-context`, indexes the chunks with `quill-retriever`, and answers
//! questions by retrieving the closest chunks and handing them to a
//! [`CompletionBackend`] as context. Backends for OpenAI, Google Gemini,
//! GitHub Models, and a local LM Studio server all register in a
//! [`BackendRegistry`] and are selected by name at runtime.
//!
//! Configuration comes from the environment (see [`ChatConfig`]); missing
//! API keys only fail when the backend that needs them is called.

pub mod backends;
pub mod config;
pub mod session;

pub use backends::{BackendError, BackendRegistry, CompletionBackend};
pub use config::ChatConfig;
pub use session::{ChatMessage, ChatSession, ChatTurn, Role, SessionError, SYSTEM_PROMPT};
