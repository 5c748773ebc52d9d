//! Tests for the sparse and dense containers.

use super::*;
use crate::error::BcError;

fn sample() -> CscMatrix<f64> {
    // 3 x 2
    // col 0: rows 0, 2
    // col 1: row 1
    CscMatrix::from_columns(3, vec![(vec![0, 2], vec![1.0, 2.0]), (vec![1], vec![3.0])]).unwrap()
}

#[test]
fn csc_column_access_and_lookup() {
    let m = sample();
    assert_eq!(m.nrows(), 3);
    assert_eq!(m.ncols(), 2);
    assert_eq!(m.nnz(), 3);
    assert_eq!(m.column(0), (&[0usize, 2][..], &[1.0, 2.0][..]));
    assert_eq!(m.get(2, 0), Some(2.0));
    assert_eq!(m.get(1, 0), None);
    assert_eq!(
        m.iter().collect::<Vec<_>>(),
        vec![(0, 0, 1.0), (2, 0, 2.0), (1, 1, 3.0)]
    );
}

#[test]
fn csc_pattern_keeps_structure_only() {
    let p = sample().pattern().unwrap();
    assert_eq!(p.nnz(), 3);
    assert!(p.contains(2, 0));
    assert!(!p.contains(0, 1));
    assert_eq!(p.column(1), &[1]);
}

#[test]
fn csc_parts_round_trip() {
    let m = sample();
    let back = CscMatrix::from_parts(m.clone().into_parts()).unwrap();
    assert_eq!(back, m);
}

#[test]
fn csc_from_parts_rejects_bad_input() {
    let bad_rows = CscParts {
        nrows: 2,
        ncols: 1,
        col_ptr: vec![0, 2],
        row_idx: vec![1, 0],
        values: vec![1.0, 1.0],
    };
    assert!(matches!(
        CscMatrix::from_parts(bad_rows),
        Err(BcError::MalformedCsc(_))
    ));

    let bad_len = CscParts {
        nrows: 2,
        ncols: 1,
        col_ptr: vec![0, 1],
        row_idx: vec![0],
        values: vec![1.0, 2.0],
    };
    assert!(matches!(
        CscMatrix::from_parts(bad_len),
        Err(BcError::MalformedCsc(_))
    ));

    let out_of_range = CscParts {
        nrows: 2,
        ncols: 1,
        col_ptr: vec![0, 1],
        row_idx: vec![2],
        values: vec![1.0],
    };
    assert!(CscMatrix::from_parts(out_of_range).is_err());
}

#[test]
fn csc_union_add_merges_columns() {
    let a = sample();
    let b = CscMatrix::from_columns(3, vec![(vec![1, 2], vec![10.0, 20.0]), (vec![], vec![])])
        .unwrap();
    let c = a.union_add(&b).unwrap();
    assert_eq!(
        c.iter().collect::<Vec<_>>(),
        vec![(0, 0, 1.0), (1, 0, 10.0), (2, 0, 22.0), (1, 1, 3.0)]
    );
}

#[test]
fn dense_export_import_preserves_entries_and_order() {
    let dense = DenseMatrix::from_vec(vec![1.0, 0.0, 2.0, 4.0, 5.0, 0.0], 3, 2);
    let parts = dense.clone().export_csc();
    assert_eq!(parts.col_ptr, vec![0, 3, 6]);
    assert_eq!(parts.row_idx, vec![0, 1, 2, 0, 1, 2]);
    assert_eq!(parts.values, dense.as_slice());

    let back = DenseMatrix::import_csc(parts).unwrap();
    assert_eq!(back, dense);
    assert_eq!(back.export_csc(), dense.export_csc());
}

#[test]
fn dense_import_scatters_sparse_parts() {
    let dense = DenseMatrix::import_csc(sample().into_parts()).unwrap();
    assert_eq!(dense.as_slice(), &[1.0, 0.0, 2.0, 0.0, 3.0, 0.0]);
    assert_eq!(dense.get(1, 1), Some(3.0));
    assert_eq!(dense.get(3, 0), None);
    assert_eq!(dense.column(0), &[1.0, 0.0, 2.0]);
}

#[test]
fn dense_filled_and_column_mut() {
    let mut d = DenseMatrix::filled(2, 3, 1.0f32).unwrap();
    d.column_mut(2)[1] = 7.0;
    assert_eq!(d.as_slice(), &[1.0, 1.0, 1.0, 1.0, 1.0, 7.0]);
    assert_eq!(DenseMatrix::filled(0, 5, 0.0f32).unwrap().as_slice().len(), 0);

    for (j, col) in d.columns_mut().enumerate() {
        col[0] = j as f32;
    }
    assert_eq!(d.as_slice(), &[0.0, 1.0, 1.0, 1.0, 2.0, 7.0]);
}

#[test]
fn dense_filled_reports_out_of_memory() {
    // rows * cols does not fit in usize.
    assert_eq!(
        DenseMatrix::<f64>::filled(usize::MAX / 2, 4, 0.0),
        Err(BcError::OutOfMemory { requested: usize::MAX })
    );
    // The element count fits, its byte size does not.
    assert_eq!(
        DenseMatrix::<f64>::filled(usize::MAX / 8, 1, 0.0),
        Err(BcError::OutOfMemory { requested: usize::MAX / 8 })
    );
    assert!(matches!(
        DenseMatrix::<f32>::from_sparse(&CscMatrix::empty(usize::MAX / 4, 2)),
        Err(BcError::OutOfMemory { .. })
    ));
}

#[test]
fn accumulator_gathers_in_row_order_and_resets() {
    let mut acc = SparseAccumulator::new(6, 0.0f64).unwrap();
    acc.add(4, 1.0);
    acc.add(1, 2.0);
    acc.add(4, 3.0);
    assert_eq!(acc.get(4), Some(4.0));
    assert!(!acc.contains(0));

    let (rows, vals) = acc.drain_sorted().unwrap();
    assert_eq!(rows, vec![1, 4]);
    assert_eq!(vals, vec![2.0, 4.0]);
    assert_eq!(acc.get(4), None);

    acc.load(&[0, 5], &[1.0, 1.0]);
    acc.clear();
    assert!(!acc.contains(5));
    assert_eq!(acc.len(), 6);
}

#[test]
fn accumulator_reuse_across_columns() {
    let mut acc = SparseAccumulator::new(4, 0.0f32).unwrap();
    for round in 0..3u8 {
        for row in (0..4).rev() {
            acc.add(row, f32::from(round));
            acc.add(row, 1.0);
        }
        let (rows, vals) = acc.drain_sorted().unwrap();
        assert_eq!(rows, vec![0, 1, 2, 3]);
        assert!(vals.iter().all(|&v| v == f32::from(round) + 1.0));
        assert_eq!(rows.capacity(), 4);
    }
    let (rows, vals) = acc.drain_sorted().unwrap();
    assert!(rows.is_empty() && vals.is_empty());
}

#[test]
fn accumulator_reports_out_of_memory() {
    assert!(matches!(
        SparseAccumulator::new(usize::MAX / 8, 0.0f64),
        Err(BcError::OutOfMemory { requested }) if requested == usize::MAX / 8
    ));
}
