//! Tests for the CSR pattern.

use super::*;

#[test]
fn test_csr_neighbors_sorted_and_deduplicated() {
    // 0 -> 2, 1, 2
    // 1 -> 0
    // 2 ->
    let adjacency = vec![vec![2, 1, 2], vec![0], vec![]];
    let csr = CsrPattern::from_adjacency(&adjacency).unwrap();

    assert_eq!(csr.node_count(), 3);
    assert_eq!(csr.edge_count(), 3);
    assert_eq!(csr.neighbors(0), &[1, 2]);
    assert_eq!(csr.neighbors(1), &[0]);
    assert!(csr.neighbors(2).is_empty());
    assert_eq!(csr.degree(0), 2);
    assert!(csr.has_edge(0, 2));
    assert!(!csr.has_edge(2, 0));
}

#[test]
fn test_csr_transpose_lists_in_neighbors() {
    // 0 -> 1, 2
    // 1 -> 2
    // 2 ->
    // 3 -> 1
    let adjacency = vec![vec![1, 2], vec![2], vec![], vec![1]];
    let csr = CsrPattern::from_adjacency(&adjacency).unwrap();
    let t = csr.transpose();

    assert!(t.neighbors(0).is_empty());
    assert_eq!(t.neighbors(1), &[0, 3]);
    assert_eq!(t.neighbors(2), &[0, 1]);
    assert!(t.neighbors(3).is_empty());
    assert_eq!(t.transpose(), csr);
}

#[test]
fn test_from_csr_parts_reconstruction() {
    let offsets = vec![0, 2, 3, 3];
    let edges = vec![1, 2, 2];

    let csr = CsrPattern::from_csr_parts(offsets, edges, 3).unwrap();
    assert_eq!(csr.neighbors(0), &[1, 2]);
    assert_eq!(csr.transpose().neighbors(2), &[0, 1]);
}

#[test]
fn test_from_csr_parts_rejects_malformed() {
    assert!(matches!(
        CsrPattern::from_csr_parts(vec![], vec![], 0),
        Err(BcError::MalformedCsc(_))
    ));
    assert!(matches!(
        CsrPattern::from_csr_parts(vec![0, 2, 1], vec![0, 1], 2),
        Err(BcError::MalformedCsc(_))
    ));
    assert!(matches!(
        CsrPattern::from_csr_parts(vec![0, 2], vec![1, 0], 2),
        Err(BcError::MalformedCsc(_))
    ));
    assert_eq!(
        CsrPattern::from_csr_parts(vec![0, 1], vec![5], 2),
        Err(BcError::EdgeOutOfRange {
            from: 0,
            to: 5,
            node_count: 2
        })
    );
}

#[test]
fn test_out_of_bounds_edge_is_an_error() {
    let err = CsrPattern::from_edges(2, &[(0, 1), (1, 2)]).unwrap_err();
    assert_eq!(
        err,
        BcError::EdgeOutOfRange {
            from: 1,
            to: 2,
            node_count: 2
        }
    );
}

#[test]
fn test_self_loop_count() {
    let csr = CsrPattern::from_edges(4, &[(0, 0), (0, 1), (2, 2), (3, 2)]).unwrap();
    assert_eq!(csr.self_loop_count(), 2);
}

#[test]
fn test_empty_graph() {
    let adjacency: Vec<Vec<usize>> = vec![];
    let csr = CsrPattern::from_adjacency(&adjacency).unwrap();
    assert_eq!(csr.node_count(), 0);
    assert_eq!(csr.edge_count(), 0);
    assert_eq!(csr.transpose().node_count(), 0);
}

#[test]
fn test_node_count_too_large_to_allocate() {
    // One empty row list per node already overflows the address space.
    let err = CsrPattern::from_edges(usize::MAX / 8, &[(0, 1)]).unwrap_err();
    assert!(matches!(err, BcError::OutOfMemory { .. }));
}
