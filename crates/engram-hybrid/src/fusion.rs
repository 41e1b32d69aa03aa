//! Result fusion.

use std::collections::HashMap;

/// RRF rank constant.
///
/// Larger values flatten the advantage of top ranks, smaller values
/// sharpen it; 60 keeps either list from dominating.
pub const RRF_K: f64 = 60.0;

/// Reciprocal Rank Fusion (RRF).
///
/// Merges two ranked id lists using:
/// score = sum(1 / (K + rank + 1))
///
/// This is a well-known rank aggregation method that:
/// - Doesn't require score normalization
/// - Handles items missing from one list gracefully
/// - Rewards items that rank well in both lists
pub fn rrf_fuse(semantic: &[i64], keyword: &[i64]) -> Vec<(i64, f64)> {
    let mut scores: HashMap<i64, f64> = HashMap::new();

    for (rank, id) in semantic.iter().enumerate() {
        *scores.entry(*id).or_insert(0.0) += 1.0 / (RRF_K + rank as f64 + 1.0);
    }

    for (rank, id) in keyword.iter().enumerate() {
        *scores.entry(*id).or_insert(0.0) += 1.0 / (RRF_K + rank as f64 + 1.0);
    }

    // Sort by combined score
    let mut results: Vec<(i64, f64)> = scores.into_iter().collect();
    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    results
}

#[cfg(test)]
#[path = "fusion_tests.rs"]
mod tests;
