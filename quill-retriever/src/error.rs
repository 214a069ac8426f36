//! Error types for index construction and search

use quill_embed::EmbedError;

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrieverError>;

/// Error type for building and querying a [`VectorIndex`](crate::retrieval::VectorIndex).
///
/// Build failures leave the index in its previous state: a failed rebuild
/// never clobbers a working index, and partial embeddings are discarded
/// rather than indexed.
#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    /// Build was invoked with zero chunks (e.g. a blank document)
    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,

    /// The embedding provider failed for a chunk or a query
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbedError),

    /// The embedding provider returned a different number of vectors than
    /// chunks submitted
    #[error("embedding backend returned {actual} vectors for {expected} chunks")]
    IncompleteEmbedding { expected: usize, actual: usize },

    /// An embedding's dimension disagrees with the rest of the index
    #[error(
        "embedding dimension mismatch: expected {expected}, got {actual}{}",
        sequence_label(.sequence)
    )]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        /// Position of the offending chunk, `None` when the query embedding
        /// is the one that disagrees
        sequence: Option<usize>,
    },
}

fn sequence_label(sequence: &Option<usize>) -> String {
    match sequence {
        Some(s) => format!(" at chunk {s}"),
        None => " for query".to_string(),
    }
}
