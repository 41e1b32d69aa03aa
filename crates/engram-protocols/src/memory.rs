//! Memory store protocol definitions.
//!
//! A memory store persists short text memories together with vector
//! embeddings and retrieves them by similarity, by keyword, or by a
//! fused combination of both.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::MemoryError;

/// Core trait for memory stores.
///
/// All operations are cooperative with respect to cancellation: a
/// cancelled token makes the operation fail with
/// [`MemoryError::Cancelled`] instead of reporting partial work.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Returns the store ID.
    fn id(&self) -> &str;

    /// Persist a memory with its embedding.
    ///
    /// The store assigns the identifier and creation timestamp. Fails
    /// with a validation error if `content` or `embedding` is empty.
    async fn store(
        &self,
        content: &str,
        embedding: &[f64],
        cancel: CancellationToken,
    ) -> Result<(), MemoryError>;

    /// Retrieve a single record by ID.
    async fn retrieve(
        &self,
        id: i64,
        cancel: CancellationToken,
    ) -> Result<Option<MemoryRecord>, MemoryError>;

    /// Semantic search: score every stored record against `embedding`
    /// by cosine similarity and return the best `top_k`.
    ///
    /// Results are sorted by descending score; records with equal
    /// scores keep no particular order.
    async fn search(
        &self,
        embedding: &[f64],
        top_k: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<SemanticMemory>, MemoryError>;

    /// Keyword search against the full-text index, best match first.
    ///
    /// A query the text engine cannot parse is an error here.
    async fn keyword_search(
        &self,
        query: &str,
        top_k: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<SemanticMemory>, MemoryError>;

    /// Hybrid search: semantic and keyword results merged by
    /// reciprocal rank fusion.
    ///
    /// Keyword failures degrade to semantic-only results instead of
    /// failing the call; cancellation and semantic failures still
    /// propagate.
    async fn hybrid_search(
        &self,
        query: &str,
        embedding: &[f64],
        top_k: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<SemanticMemory>, MemoryError>;
}

/// A stored memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Identifier assigned by the store on creation, monotonically
    /// increasing and never reused.
    pub id: i64,

    /// Text content of the memory.
    pub content: String,

    /// Embedding vector supplied by the caller at store time.
    pub embedding: Vec<f64>,

    /// When the memory was created (set by the store).
    pub created_at: DateTime<Utc>,
}

/// Score attached to a search result.
///
/// The three search paths rank by different, non-interchangeable
/// metrics; the variant records which one produced the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SearchScore {
    /// Cosine similarity in [-1, 1], from semantic search.
    Similarity(f64),

    /// Positive engine-defined relevance, from keyword search. Only
    /// comparable within a single result list.
    Relevance(f64),

    /// Summed reciprocal-rank value, from hybrid search. Not a
    /// similarity or relevance metric.
    Fused(f64),
}

impl SearchScore {
    /// The raw score value, regardless of which search produced it.
    pub fn value(&self) -> f64 {
        match self {
            SearchScore::Similarity(v) => *v,
            SearchScore::Relevance(v) => *v,
            SearchScore::Fused(v) => *v,
        }
    }
}

/// A single search result, copied from a stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticMemory {
    pub id: i64,
    pub content: String,
    pub score: SearchScore,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
