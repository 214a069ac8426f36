//! quill-retriever: in-memory semantic search over one document's chunks
//!
//! This crate owns the index half of the quill retrieval core. It embeds an
//! ordered sequence of text chunks through a [`quill_embed::EmbeddingProvider`]
//! and answers top-K nearest-neighbor queries by exact Euclidean distance.
//!
//! The index is deliberately session-scoped: it lives in process memory, is
//! built once per document, and is replaced wholesale when a new document is
//! processed. There is no persistence and no incremental update path.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quill_embed::{EmbedConfig, FastEmbedProvider};
//! use quill_retriever::retrieval::VectorIndex;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = Arc::new(FastEmbedProvider::create(EmbedConfig::default()).await?);
//! let index = VectorIndex::new(provider);
//!
//! index.build(vec!["hello world".into(), "goodbye world".into()]).await?;
//! let hits = index.search("hello", 5).await?;
//! assert_eq!(hits.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! chunks → EmbeddingProvider → vectors → IndexState (immutable, Arc-swapped)
//!                                            ↓
//! query  → EmbeddingProvider → vector → exact L2 scan → ranked SearchHits
//! ```

pub mod error;
pub mod retrieval;

pub use error::{Result, RetrieverError};
pub use retrieval::{SearchHit, VectorIndex};
