//! Row scans and index queries for the hybrid store.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use tokio_util::sync::CancellationToken;

use engram_protocols::memory::{MemoryRecord, SearchScore, SemanticMemory};

use crate::embedding::{cosine_similarity, decode_embedding};

/// Scan every row and score it against the query embedding.
///
/// Returns `None` if the scan was cancelled part-way through; the
/// candidates are unsorted.
pub(crate) fn scan_semantic(
    conn: &rusqlite::Connection,
    query: &[f64],
    cancel: &CancellationToken,
) -> Result<Option<Vec<SemanticMemory>>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT id, content, embedding, created_at FROM memories")?;
    let mut rows = stmt.query([])?;

    let mut candidates = Vec::new();
    while let Some(row) = rows.next()? {
        if cancel.is_cancelled() {
            return Ok(None);
        }

        let id: i64 = row.get(0)?;
        let content: String = row.get(1)?;
        let blob: Vec<u8> = row.get(2)?;
        let created_str: String = row.get(3)?;

        let stored = decode_embedding(&blob)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Blob, Box::new(e)))?;

        candidates.push(SemanticMemory {
            id,
            content,
            score: SearchScore::Similarity(cosine_similarity(query, &stored)),
            created_at: parse_timestamp(&created_str)?,
        });
    }

    Ok(Some(candidates))
}

/// Query the FTS index, best match first.
pub(crate) fn query_keyword(
    conn: &rusqlite::Connection,
    query: &str,
    limit: usize,
) -> Result<Vec<SemanticMemory>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.content, m.created_at, bm25(memories_fts) AS score
         FROM memories_fts
         JOIN memories m ON m.id = memories_fts.rowid
         WHERE memories_fts MATCH ?1
         ORDER BY score
         LIMIT ?2",
    )?;

    let mut rows = stmt.query(rusqlite::params![query, limit as i64])?;

    let mut results = Vec::new();
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let content: String = row.get(1)?;
        let created_str: String = row.get(2)?;
        let raw: f64 = row.get(3)?;

        results.push(SemanticMemory {
            id,
            content,
            // bm25 is more negative for better matches; the sigmoid keeps
            // relevance positive and decreasing with rank
            score: SearchScore::Relevance(1.0 / (1.0 + raw.exp())),
            created_at: parse_timestamp(&created_str)?,
        });
    }

    Ok(results)
}

/// Fetch a single record by id.
pub(crate) fn get_record(
    conn: &rusqlite::Connection,
    id: i64,
) -> Result<Option<MemoryRecord>, rusqlite::Error> {
    let mut stmt =
        conn.prepare("SELECT id, content, embedding, created_at FROM memories WHERE id = ?1")?;

    let record = stmt.query_row([id], |row| {
        let id: i64 = row.get(0)?;
        let content: String = row.get(1)?;
        let blob: Vec<u8> = row.get(2)?;
        let created_str: String = row.get(3)?;
        Ok((id, content, blob, created_str))
    });

    match record {
        Ok((id, content, blob, created_str)) => {
            let embedding = decode_embedding(&blob).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, Type::Blob, Box::new(e))
            })?;

            Ok(Some(MemoryRecord {
                id,
                content,
                embedding,
                created_at: parse_timestamp(&created_str)?,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))
}
