//! Configuration for embedding models

use crate::error::{EmbedError, Result};
use fastembed::EmbeddingModel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for embedding models.
///
/// Model names accept both the short form ("all-MiniLM-L6-v2") and the
/// HuggingFace repository form ("sentence-transformers/all-MiniLM-L6-v2"),
/// so a value copied from a sentence-transformers setup resolves to the same
/// built-in fastembed model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Name of the embedding model to use
    pub model_name: String,
    /// Maximum batch size for embedding generation
    pub batch_size: usize,
    /// Whether to L2-normalize embeddings
    pub normalize: bool,
    /// Directory where downloaded model files are cached. `None` uses the
    /// fastembed default.
    pub cache_dir: Option<PathBuf>,
}

impl EmbedConfig {
    /// Create a new embedding configuration for the given model name.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            batch_size: 32,
            normalize: true,
            cache_dir: None,
        }
    }

    /// Set the batch size for embedding generation (builder style)
    pub fn with_batch_size(self, batch_size: usize) -> Self {
        Self { batch_size, ..self }
    }

    /// Set whether to normalize embeddings (builder style)
    pub fn with_normalize(self, normalize: bool) -> Self {
        Self { normalize, ..self }
    }

    /// Set the model cache directory (builder style)
    pub fn with_cache_dir(self, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: Some(cache_dir.into()),
            ..self
        }
    }

    /// Get the configured model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Resolve the configured model name to a built-in fastembed model.
    ///
    /// Unknown names are a configuration error rather than a silent fallback:
    /// retrieval results are meaningless if the query and corpus are embedded
    /// by different models, so a typo must fail loudly at initialization.
    pub fn embedding_model(&self) -> Result<EmbeddingModel> {
        match self.model_name.as_str() {
            "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
                Ok(EmbeddingModel::AllMiniLML6V2)
            }
            "all-MiniLM-L12-v2" | "sentence-transformers/all-MiniLM-L12-v2" => {
                Ok(EmbeddingModel::AllMiniLML12V2)
            }
            "bge-small-en-v1.5" | "BAAI/bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            "bge-base-en-v1.5" | "BAAI/bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
            "nomic-embed-text-v1.5" | "nomic-ai/nomic-embed-text-v1.5" => {
                Ok(EmbeddingModel::NomicEmbedTextV15)
            }
            other => Err(EmbedError::invalid_config(format!(
                "Unknown embedding model: {other}"
            ))),
        }
    }
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self::new("all-MiniLM-L6-v2")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = EmbedConfig::new("all-MiniLM-L6-v2");

        assert_eq!(config.model_name(), "all-MiniLM-L6-v2");
        assert_eq!(config.batch_size, 32);
        assert!(config.normalize);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_config_builder_methods() {
        let config = EmbedConfig::default()
            .with_batch_size(64)
            .with_normalize(false)
            .with_cache_dir("/tmp/models");

        assert_eq!(config.batch_size, 64);
        assert!(!config.normalize);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/models")));
    }

    #[test]
    fn test_model_name_resolution() {
        let short = EmbedConfig::new("all-MiniLM-L6-v2");
        let repo = EmbedConfig::new("sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(
            short.embedding_model().unwrap(),
            repo.embedding_model().unwrap()
        );
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let config = EmbedConfig::new("definitely-not-a-model");
        let err = config.embedding_model().unwrap_err();
        assert!(matches!(err, EmbedError::InvalidConfig { .. }));
    }
}
