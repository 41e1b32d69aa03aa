//! Embedding byte codec and similarity scoring.

use thiserror::Error;

/// Error type for embedding blob decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Embedding blob length {0} is not a multiple of 8")]
    TruncatedBlob(usize),
}

/// Encode an embedding as a little-endian IEEE-754 byte blob.
///
/// Produces exactly `8 * len` bytes, one chunk per component, in
/// original order. This is the on-disk representation, so the
/// transcoding is bit-for-bit lossless.
pub fn encode_embedding(vector: &[f64]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(vector.len() * 8);
    for &value in vector {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

/// Decode an embedding blob back into a vector.
///
/// Inverse of [`encode_embedding`]. A blob whose length is not a
/// multiple of 8 is malformed stored data.
pub fn decode_embedding(blob: &[u8]) -> Result<Vec<f64>, CodecError> {
    if blob.len() % 8 != 0 {
        return Err(CodecError::TruncatedBlob(blob.len()));
    }

    Ok(blob
        .chunks_exact(8)
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            f64::from_le_bytes(bytes)
        })
        .collect())
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 when the lengths differ, either vector is empty, or
/// either vector has zero norm. Scoring runs per-row inside a scan,
/// so a mismatched row scores 0 rather than failing the search.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
#[path = "embedding_tests.rs"]
mod tests;
