//! Hybrid memory store for Engram.
//!
//! Combines brute-force vector similarity search with keyword-based
//! FTS5 full-text search using Reciprocal Rank Fusion (RRF) to merge
//! results.
//!
//! ## How It Works
//!
//! 1. A memory is appended to a SQLite row store together with an
//!    FTS5 index entry under the same id, in a single transaction
//! 2. Semantic search scans every row and ranks by cosine similarity
//! 3. Keyword search delegates to FTS5 bm25 ranking
//! 4. Hybrid search runs both and fuses the ranked lists with RRF;
//!    keyword failures degrade to semantic-only results

mod backend;
mod embedding;
mod fusion;
mod schema;

pub use backend::HybridMemoryStore;
pub use embedding::{cosine_similarity, decode_embedding, encode_embedding, CodecError};
pub use fusion::{rrf_fuse, RRF_K};
