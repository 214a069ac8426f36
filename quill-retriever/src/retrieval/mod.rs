//! Core retrieval: chunk embeddings and exact nearest-neighbor search.

pub mod vector_index;

pub use vector_index::{SearchHit, VectorIndex};
