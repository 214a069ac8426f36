//! # quill-embed
//!
//! Text embedding generation for the quill retrieval pipeline, built on
//! local ONNX models via FastEmbed. Designed for async operation with a
//! provider trait that keeps the rest of the system independent of any
//! particular embedding backend.
//!
//! ## Features
//!
//! - **Local ONNX Models**: embeddings run locally, no external API calls
//! - **Async-First Design**: inference happens on blocking tasks under tokio
//! - **Model Caching**: identically configured providers share one loaded model
//! - **Half-Precision**: memory-efficient f16 embeddings
//!
//! ## Quick Start
//!
//! ```no_run
//! use quill_embed::{EmbedConfig, EmbeddingProvider, FastEmbedProvider};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = FastEmbedProvider::create(EmbedConfig::default()).await?;
//!
//! let texts = vec!["Hello world".to_string(), "How are you?".to_string()];
//! let result = provider.embed_texts(&texts).await?;
//!
//! println!("Generated {} embeddings of dimension {}",
//!          result.len(), result.dimension);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`] using the crate's [`EmbedError`] type,
//! which separates configuration errors (unknown model name, uninitialized
//! provider) from runtime inference failures.

pub mod config;
pub mod error;
pub mod provider;

// Re-export main types for easy access
pub use config::EmbedConfig;
pub use error::{EmbedError, Result};
pub use provider::{EmbeddingProvider, EmbeddingResult, FastEmbedProvider};
