//! In-memory exact nearest-neighbor index over document chunks.

use half::f16;
use quill_embed::EmbeddingProvider;
use std::sync::{Arc, RwLock};

use crate::error::{Result, RetrieverError};

/// One ranked search result: a chunk and its distance to the query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Position of the chunk in the original split sequence (0-indexed)
    pub sequence: usize,
    /// The chunk text
    pub text: String,
    /// Euclidean (L2) distance between the query and chunk embeddings.
    /// Lower is more similar.
    pub distance: f32,
}

/// The fully-built, immutable state of an index: the chunk texts and their
/// embeddings, associated 1:1 by position.
struct IndexState {
    chunks: Vec<String>,
    embeddings: Vec<Vec<f16>>,
    dimension: usize,
}

/// An exact-search vector index over the chunks of a single document.
///
/// Corpus sizes here are single-document chunk counts, typically tens to low
/// hundreds, so the index scans every stored vector per query. Exact search
/// keeps ranking deterministic and avoids tuning an approximation parameter
/// that this scale does not need.
///
/// [`build`](Self::build) embeds every chunk through the owned provider and
/// publishes the finished state with a single swap; a concurrent
/// [`search`](Self::search) sees either the previous complete index or the
/// new one, never a partial build. Rebuilding for a new document replaces the
/// prior state wholesale.
pub struct VectorIndex {
    provider: Arc<dyn EmbeddingProvider>,
    state: RwLock<Option<Arc<IndexState>>>,
}

impl VectorIndex {
    /// Creates an empty index backed by the given embedding provider.
    ///
    /// The provider embeds both the corpus at build time and every query, so
    /// all vectors live in one space.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            state: RwLock::new(None),
        }
    }

    /// Whether a build has completed successfully.
    pub fn is_built(&self) -> bool {
        self.state.read().unwrap().is_some()
    }

    /// Number of chunks in the current index, 0 if unbuilt.
    pub fn chunk_count(&self) -> usize {
        self.state
            .read()
            .unwrap()
            .as_ref()
            .map(|s| s.chunks.len())
            .unwrap_or(0)
    }

    /// Embeds `chunks` and builds the search structure over them, replacing
    /// any previously built state.
    ///
    /// Fails with [`RetrieverError::EmptyCorpus`] when `chunks` is empty, and
    /// propagates embedding failures without touching the existing state.
    pub async fn build(&self, chunks: Vec<String>) -> Result<()> {
        if chunks.is_empty() {
            return Err(RetrieverError::EmptyCorpus);
        }

        let result = self.provider.embed_texts(&chunks).await?;
        if result.len() != chunks.len() {
            return Err(RetrieverError::IncompleteEmbedding {
                expected: chunks.len(),
                actual: result.len(),
            });
        }

        // Dimensionality comes from the first vector; every other vector
        // must agree with it before anything is published.
        let dimension = result.dimension;
        for (sequence, embedding) in result.embeddings.iter().enumerate() {
            if embedding.len() != dimension {
                return Err(RetrieverError::DimensionMismatch {
                    expected: dimension,
                    actual: embedding.len(),
                    sequence: Some(sequence),
                });
            }
        }

        tracing::info!(
            chunks = chunks.len(),
            dimension,
            "built vector index"
        );

        let state = IndexState {
            chunks,
            embeddings: result.embeddings,
            dimension,
        };
        *self.state.write().unwrap() = Some(Arc::new(state));

        Ok(())
    }

    /// Returns up to `min(top_k, chunk_count)` chunks ranked by ascending L2
    /// distance to the query. Ties keep original chunk order.
    ///
    /// An unbuilt index returns an empty result rather than an error, so
    /// "no document loaded" reads the same as "no matches".
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let snapshot = self.state.read().unwrap().clone();
        let Some(state) = snapshot else {
            return Ok(Vec::new());
        };
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.provider.embed_text(query).await?;
        if query_embedding.len() != state.dimension {
            return Err(RetrieverError::DimensionMismatch {
                expected: state.dimension,
                actual: query_embedding.len(),
                sequence: None,
            });
        }

        let mut scored: Vec<(usize, f32)> = state
            .embeddings
            .iter()
            .enumerate()
            .map(|(sequence, embedding)| (sequence, l2_distance(&query_embedding, embedding)))
            .collect();

        // Stable sort: equal distances keep original chunk order
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k.min(state.chunks.len()));

        tracing::debug!(results = scored.len(), top_k, "search complete");

        Ok(scored
            .into_iter()
            .map(|(sequence, distance)| SearchHit {
                sequence,
                text: state.chunks[sequence].clone(),
                distance,
            })
            .collect())
    }
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("provider", &self.provider.provider_name())
            .field("chunks", &self.chunk_count())
            .finish()
    }
}

/// Euclidean distance between two f16 embedding vectors, accumulated in f32.
fn l2_distance(a: &[f16], b: &[f16]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f32::from(*x) - f32::from(*y);
            d * d
        })
        .sum::<f32>()
        .sqrt()
}
