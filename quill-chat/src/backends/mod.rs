//! Chat completion backends and the registry that dispatches between them.
//!
//! Every backend speaks the same [`CompletionBackend`] trait, so the session
//! layer never branches on backend names. New backends register under a name
//! in the [`BackendRegistry`]; lookup at call time selects the implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ChatConfig;

pub mod gemini;
pub mod openai_compat;

pub use gemini::GeminiBackend;
pub use openai_compat::OpenAiCompatBackend;

/// Result type for completion calls.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors from a chat completion backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend is registered but its credential is not configured.
    /// Raised before any network traffic.
    #[error("backend '{backend}' requires {variable} to be set")]
    MissingCredentials {
        backend: &'static str,
        variable: &'static str,
    },

    /// Transport-level failure (connection refused, timeout, TLS)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response parsed but did not contain a completion
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A chat completion backend.
///
/// Implementations take the already-assembled system prompt, retrieved
/// context, and user question, and return the model's answer text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Generate a completion grounded in `context`.
    async fn complete(&self, system_prompt: &str, context: &str, question: &str)
    -> Result<String>;

    /// Short registry name of this backend, e.g. "openai"
    fn backend_name(&self) -> &str;
}

/// Name-keyed registry of completion backends.
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn CompletionBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under its own name, replacing any previous entry.
    pub fn register(&mut self, backend: Arc<dyn CompletionBackend>) {
        self.backends
            .insert(backend.backend_name().to_string(), backend);
    }

    /// Look up a backend by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn CompletionBackend>> {
        self.backends.get(name).cloned()
    }

    /// Registered backend names, sorted for stable display.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.backends.keys().cloned().collect();
        names.sort();
        names
    }

    /// Build the standard registry from configuration: OpenAI, Gemini,
    /// GitHub Models, and LM Studio.
    ///
    /// All four register regardless of which credentials are present;
    /// credential checks happen per call so a missing key only affects the
    /// backend that needs it.
    pub fn from_config(config: &ChatConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(OpenAiCompatBackend::openai(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )));
        registry.register(Arc::new(GeminiBackend::new(
            config.google_api_key.clone(),
            config.gemini_model.clone(),
        )));
        registry.register(Arc::new(OpenAiCompatBackend::github(
            config.github_token.clone(),
            config.github_model.clone(),
        )));
        registry.register(Arc::new(OpenAiCompatBackend::lm_studio(
            config.lm_studio_endpoint.clone(),
            config.lm_studio_model.clone(),
        )));
        registry
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.names())
            .finish()
    }
}
