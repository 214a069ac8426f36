//! Environment-driven configuration for the chat assistant.

use std::env;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_usize_or(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Runtime configuration, read once from the environment at startup.
///
/// Credentials stay optional: a backend with no key still registers, and the
/// missing credential surfaces as an error only when that backend is actually
/// asked to complete. Everything else has a working default so the local
/// LM Studio path runs with an empty environment.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// OpenAI API key, if set
    pub openai_api_key: Option<String>,
    /// OpenAI chat model
    pub openai_model: String,
    /// Google API key for Gemini, if set
    pub google_api_key: Option<String>,
    /// Gemini model
    pub gemini_model: String,
    /// GitHub token for GitHub Models, if set
    pub github_token: Option<String>,
    /// Model served through GitHub Models
    pub github_model: String,
    /// Base URL of a local LM Studio server, including the /v1 prefix
    pub lm_studio_endpoint: String,
    /// Model identifier LM Studio should serve
    pub lm_studio_model: String,
    /// Embedding model for chunk and query vectors
    pub embedding_model: String,
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Word overlap carried between adjacent chunks
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question
    pub top_k_chunks: usize,
}

impl ChatConfig {
    /// Read configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o"),
            google_api_key: env_opt("GOOGLE_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.0-flash"),
            github_token: env_opt("GITHUB_TOKEN"),
            github_model: env_or("GITHUB_MODEL", "gpt-4o-mini"),
            lm_studio_endpoint: env_or("LM_STUDIO_ENDPOINT", "http://localhost:1234/v1"),
            lm_studio_model: env_or("LM_STUDIO_MODEL", "local-model"),
            embedding_model: env_or("EMBEDDING_MODEL", "sentence-transformers/all-MiniLM-L6-v2"),
            chunk_size: env_usize_or("CHUNK_SIZE", 500),
            chunk_overlap: env_usize_or("CHUNK_OVERLAP", 50),
            top_k_chunks: env_usize_or("TOP_K_CHUNKS", 3),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-4o".to_string(),
            google_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            github_token: None,
            github_model: "gpt-4o-mini".to_string(),
            lm_studio_endpoint: "http://localhost:1234/v1".to_string(),
            lm_studio_model: "local-model".to_string(),
            embedding_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            chunk_size: 500,
            chunk_overlap: 50,
            top_k_chunks: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.github_model, "gpt-4o-mini");
        assert_eq!(config.lm_studio_endpoint, "http://localhost:1234/v1");
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.top_k_chunks, 3);
        assert!(config.openai_api_key.is_none());
    }
}
