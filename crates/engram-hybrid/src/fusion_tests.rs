use super::*;

#[test]
fn test_rrf_fuse_basic() {
    let semantic = vec![1, 2, 3];
    let keyword = vec![2, 1, 4];

    let results = rrf_fuse(&semantic, &keyword);
    assert_eq!(results.len(), 4);

    // Find positions
    let pos_1 = results.iter().position(|(id, _)| *id == 1);
    let pos_4 = results.iter().position(|(id, _)| *id == 4);

    // Id 1 appears in both lists, id 4 only in keyword
    assert!(pos_1.unwrap() < pos_4.unwrap());
}

#[test]
fn test_rrf_fuse_dual_presence_sums() {
    // Rank 0 in both lists: 2 / (K + 1)
    let results = rrf_fuse(&[7], &[7]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, 7);
    assert!((results[0].1 - 2.0 / (RRF_K + 1.0)).abs() < 1e-12);
}

#[test]
fn test_rrf_fuse_single_list_score() {
    let results = rrf_fuse(&[7], &[]);
    assert!((results[0].1 - 1.0 / (RRF_K + 1.0)).abs() < 1e-12);

    let results = rrf_fuse(&[], &[7]);
    assert!((results[0].1 - 1.0 / (RRF_K + 1.0)).abs() < 1e-12);
}

#[test]
fn test_rrf_fuse_empty_lists() {
    let results = rrf_fuse(&[], &[]);
    assert!(results.is_empty());

    let results = rrf_fuse(&[1], &[]);
    assert_eq!(results.len(), 1);

    let results = rrf_fuse(&[], &[1]);
    assert_eq!(results.len(), 1);
}

#[test]
fn test_rrf_fuse_no_duplicate_ids() {
    let results = rrf_fuse(&[1, 2, 3], &[3, 2, 1]);
    assert_eq!(results.len(), 3);

    let mut ids: Vec<i64> = results.iter().map(|(id, _)| *id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_rrf_fuse_produces_sorted_results() {
    let semantic = vec![1, 2, 3];
    let keyword = vec![4, 5, 6];

    let results = rrf_fuse(&semantic, &keyword);

    // Verify results are sorted by score descending
    for i in 1..results.len() {
        assert!(results[i - 1].1 >= results[i].1);
    }
}

#[test]
fn test_rrf_fuse_rank_decay() {
    let results = rrf_fuse(&[1, 2], &[]);

    let first = results.iter().find(|(id, _)| *id == 1).unwrap().1;
    let second = results.iter().find(|(id, _)| *id == 2).unwrap().1;

    assert!((first - 1.0 / (RRF_K + 1.0)).abs() < 1e-12);
    assert!((second - 1.0 / (RRF_K + 2.0)).abs() < 1e-12);
    assert!(first > second);
}

#[test]
fn test_rrf_fuse_dual_match_beats_single_top_rank() {
    // Id 9 is mid-ranked in both lists; id 1 and id 4 top one list each.
    let results = rrf_fuse(&[1, 9, 3], &[4, 9, 6]);
    assert_eq!(results[0].0, 9);
}
