//! Hybrid memory store implementation.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use tokio_rusqlite::Connection;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use engram_protocols::error::MemoryError;
use engram_protocols::memory::{MemoryRecord, MemoryStore, SearchScore, SemanticMemory};

use crate::embedding::encode_embedding;
use crate::fusion::rrf_fuse;
use crate::schema::init_schema;

#[path = "backend_search.rs"]
mod backend_search;
use backend_search::{get_record, query_keyword, scan_semantic};

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;

/// SQLite-backed hybrid memory store.
///
/// The row store and the FTS5 text index live in the same database
/// and share the id key space; a memory is written to both inside a
/// single transaction, so every row always has a matching index
/// entry.
pub struct HybridMemoryStore {
    conn: Connection,
}

impl HybridMemoryStore {
    /// Create a new in-memory store.
    pub async fn in_memory() -> Result<Self, MemoryError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| MemoryError::ConnectionError(e.to_string()))?;
        Self::init(conn).await
    }

    /// Create a new file-backed store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(path)
            .await
            .map_err(|e| MemoryError::ConnectionError(e.to_string()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, MemoryError> {
        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| MemoryError::QueryError(e.to_string()))?;

        Ok(Self { conn })
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), MemoryError> {
    if cancel.is_cancelled() {
        return Err(MemoryError::Cancelled);
    }
    Ok(())
}

fn ensure_positive_top_k(top_k: usize) -> Result<(), MemoryError> {
    if top_k == 0 {
        return Err(MemoryError::ValidationError(
            "top_k must be positive".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl MemoryStore for HybridMemoryStore {
    fn id(&self) -> &str {
        "hybrid-sqlite"
    }

    async fn store(
        &self,
        content: &str,
        embedding: &[f64],
        cancel: CancellationToken,
    ) -> Result<(), MemoryError> {
        if content.is_empty() {
            return Err(MemoryError::ValidationError(
                "content must not be empty".to_string(),
            ));
        }
        if embedding.is_empty() {
            return Err(MemoryError::ValidationError(
                "embedding must not be empty".to_string(),
            ));
        }
        ensure_not_cancelled(&cancel)?;

        let content = content.to_string();
        let blob = encode_embedding(embedding);
        let created = Utc::now().to_rfc3339();

        let id = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                tx.execute(
                    "INSERT INTO memories (content, embedding, created_at) VALUES (?1, ?2, ?3)",
                    rusqlite::params![content, blob, created],
                )?;
                let id = tx.last_insert_rowid();

                tx.execute(
                    "INSERT INTO memories_fts (rowid, content) VALUES (?1, ?2)",
                    rusqlite::params![id, content],
                )?;

                tx.commit()?;
                Ok(id)
            })
            .await
            .map_err(|e| MemoryError::StorageError(e.to_string()))?;

        debug!("Stored memory {}", id);
        Ok(())
    }

    async fn retrieve(
        &self,
        id: i64,
        cancel: CancellationToken,
    ) -> Result<Option<MemoryRecord>, MemoryError> {
        ensure_not_cancelled(&cancel)?;

        self.conn
            .call(move |conn| Ok(get_record(conn, id)?))
            .await
            .map_err(|e| MemoryError::StorageError(e.to_string()))
    }

    async fn search(
        &self,
        embedding: &[f64],
        top_k: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<SemanticMemory>, MemoryError> {
        if embedding.is_empty() {
            return Err(MemoryError::ValidationError(
                "embedding must not be empty".to_string(),
            ));
        }
        ensure_positive_top_k(top_k)?;
        ensure_not_cancelled(&cancel)?;

        let query = embedding.to_vec();
        let token = cancel.clone();
        let candidates = self
            .conn
            .call(move |conn| Ok(scan_semantic(conn, &query, &token)?))
            .await
            .map_err(|e| MemoryError::StorageError(e.to_string()))?;

        // A scan interrupted by cancellation never yields a partial list.
        let mut candidates = candidates.ok_or(MemoryError::Cancelled)?;

        candidates.sort_by(|a, b| {
            b.score
                .value()
                .partial_cmp(&a.score.value())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(top_k);

        Ok(candidates)
    }

    async fn keyword_search(
        &self,
        query: &str,
        top_k: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<SemanticMemory>, MemoryError> {
        if query.is_empty() {
            return Err(MemoryError::ValidationError(
                "query must not be empty".to_string(),
            ));
        }
        ensure_positive_top_k(top_k)?;
        ensure_not_cancelled(&cancel)?;

        let query = query.to_string();
        self.conn
            .call(move |conn| Ok(query_keyword(conn, &query, top_k)?))
            .await
            .map_err(|e| MemoryError::QueryError(format!("FTS search failed: {}", e)))
    }

    async fn hybrid_search(
        &self,
        query: &str,
        embedding: &[f64],
        top_k: usize,
        cancel: CancellationToken,
    ) -> Result<Vec<SemanticMemory>, MemoryError> {
        if query.is_empty() {
            return Err(MemoryError::ValidationError(
                "query must not be empty".to_string(),
            ));
        }
        if embedding.is_empty() {
            return Err(MemoryError::ValidationError(
                "embedding must not be empty".to_string(),
            ));
        }
        ensure_positive_top_k(top_k)?;
        ensure_not_cancelled(&cancel)?;

        let semantic = self.search(embedding, top_k, cancel.clone()).await?;

        let keyword = match self.keyword_search(query, top_k, cancel.clone()).await {
            Ok(results) => results,
            Err(MemoryError::Cancelled) => return Err(MemoryError::Cancelled),
            Err(e) => {
                debug!("Keyword search failed, degrading to semantic-only results: {}", e);
                Vec::new()
            }
        };

        let semantic_ids: Vec<i64> = semantic.iter().map(|m| m.id).collect();
        let keyword_ids: Vec<i64> = keyword.iter().map(|m| m.id).collect();
        let fused = rrf_fuse(&semantic_ids, &keyword_ids);

        let mut by_id: HashMap<i64, SemanticMemory> = HashMap::new();
        for hit in keyword.into_iter().chain(semantic) {
            by_id.insert(hit.id, hit);
        }

        let results = fused
            .into_iter()
            .take(top_k)
            .filter_map(|(id, score)| {
                by_id.remove(&id).map(|mut hit| {
                    hit.score = SearchScore::Fused(score);
                    hit
                })
            })
            .collect();

        Ok(results)
    }
}
