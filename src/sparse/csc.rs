//! Compressed sparse column containers.
//!
//! Every `n × k` operand of the batched search is stored column-major with one
//! column per BFS source, so a source's whole search state is one contiguous
//! run of `row_idx`/`values`.

use core::ops::Add;

use crate::error::{try_copied, try_with_capacity, BcError};

/// Raw compressed-column arrays, used to move a matrix's buffers in and out
/// without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct CscParts<T> {
    /// Number of rows.
    pub nrows: usize,
    /// Number of columns.
    pub ncols: usize,
    /// Column offsets, length `ncols + 1`.
    pub col_ptr: Vec<usize>,
    /// Row index of every entry, sorted within each column.
    pub row_idx: Vec<usize>,
    /// Value of every entry, parallel to `row_idx`.
    pub values: Vec<T>,
}

/// A sparse numeric `nrows × ncols` matrix in compressed-column form.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix<T> {
    nrows: usize,
    ncols: usize,
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T: Copy> CscMatrix<T> {
    /// An `nrows × ncols` matrix with no entries.
    pub fn empty(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            col_ptr: vec![0; ncols + 1],
            row_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Assembles a matrix from per-column `(rows, values)` pairs.
    ///
    /// Row order and range are checked in debug builds only; callers are the
    /// crate's own column kernels, which emit sorted in-range rows.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the compressed arrays cannot be
    /// allocated.
    ///
    /// # Panics
    /// Panics if a column's rows and values differ in length.
    pub fn from_columns(
        nrows: usize,
        columns: Vec<(Vec<usize>, Vec<T>)>,
    ) -> Result<Self, BcError> {
        let ncols = columns.len();
        let nnz = columns.iter().map(|(r, _)| r.len()).sum();
        let mut col_ptr = try_with_capacity(ncols + 1)?;
        let mut row_idx = try_with_capacity(nnz)?;
        let mut values = try_with_capacity(nnz)?;
        col_ptr.push(0);
        for (rows, vals) in columns {
            assert_eq!(rows.len(), vals.len(), "column rows/values length mismatch");
            debug_assert!(rows.windows(2).all(|w| w[0] < w[1]), "column rows unsorted");
            debug_assert!(rows.iter().all(|&r| r < nrows), "row out of range");
            row_idx.extend(rows);
            values.extend(vals);
            col_ptr.push(row_idx.len());
        }
        Ok(Self {
            nrows,
            ncols,
            col_ptr,
            row_idx,
            values,
        })
    }

    /// Imports compressed parts, taking ownership of the buffers.
    ///
    /// # Errors
    /// Returns [`BcError::MalformedCsc`] if the arrays are inconsistent.
    pub fn from_parts(parts: CscParts<T>) -> Result<Self, BcError> {
        validate_structure(parts.nrows, parts.ncols, &parts.col_ptr, &parts.row_idx)?;
        if parts.values.len() != parts.row_idx.len() {
            return Err(BcError::MalformedCsc("values length must equal row_idx length"));
        }
        Ok(Self {
            nrows: parts.nrows,
            ncols: parts.ncols,
            col_ptr: parts.col_ptr,
            row_idx: parts.row_idx,
            values: parts.values,
        })
    }

    /// Exports the buffers, consuming the matrix.
    pub fn into_parts(self) -> CscParts<T> {
        CscParts {
            nrows: self.nrows,
            ncols: self.ncols,
            col_ptr: self.col_ptr,
            row_idx: self.row_idx,
            values: self.values,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.row_idx.len()
    }

    /// Returns `true` if no entry is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_idx.is_empty()
    }

    /// Rows and values of column `j`.
    #[inline]
    pub fn column(&self, j: usize) -> (&[usize], &[T]) {
        let range = self.col_ptr[j]..self.col_ptr[j + 1];
        (&self.row_idx[range.clone()], &self.values[range])
    }

    /// Value at `(i, j)`, if stored.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        let (rows, vals) = self.column(j);
        rows.binary_search(&i).ok().map(|p| vals[p])
    }

    /// All stored values in column-major order.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Column offsets.
    #[inline]
    pub fn col_ptr(&self) -> &[usize] {
        &self.col_ptr
    }

    /// Iterates `(row, col, value)` in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.ncols).flat_map(move |j| {
            let (rows, vals) = self.column(j);
            rows.iter().zip(vals).map(move |(&i, &v)| (i, j, v))
        })
    }

    /// The boolean structure of this matrix.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the index arrays cannot be copied.
    pub fn pattern(&self) -> Result<Pattern, BcError> {
        Ok(Pattern {
            nrows: self.nrows,
            ncols: self.ncols,
            col_ptr: try_copied(&self.col_ptr)?,
            row_idx: try_copied(&self.row_idx)?,
        })
    }
}

impl<T: Copy + Add<Output = T>> CscMatrix<T> {
    /// Element-wise union: entries present in both operands are summed.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the merged arrays cannot be allocated.
    ///
    /// # Panics
    /// Panics if the shapes differ.
    pub fn union_add(&self, other: &Self) -> Result<Self, BcError> {
        assert_eq!(
            (self.nrows, self.ncols),
            (other.nrows, other.ncols),
            "union_add shape mismatch"
        );
        let bound = self.nnz() + other.nnz();
        let mut col_ptr = try_with_capacity(self.ncols + 1)?;
        let mut row_idx = try_with_capacity(bound)?;
        let mut values = try_with_capacity(bound)?;
        col_ptr.push(0);
        for j in 0..self.ncols {
            let (ra, va) = self.column(j);
            let (rb, vb) = other.column(j);
            let (mut a, mut b) = (0, 0);
            while a < ra.len() || b < rb.len() {
                if b == rb.len() || (a < ra.len() && ra[a] < rb[b]) {
                    row_idx.push(ra[a]);
                    values.push(va[a]);
                    a += 1;
                } else if a == ra.len() || rb[b] < ra[a] {
                    row_idx.push(rb[b]);
                    values.push(vb[b]);
                    b += 1;
                } else {
                    row_idx.push(ra[a]);
                    values.push(va[a] + vb[b]);
                    a += 1;
                    b += 1;
                }
            }
            col_ptr.push(row_idx.len());
        }
        Ok(Self {
            nrows: self.nrows,
            ncols: self.ncols,
            col_ptr,
            row_idx,
            values,
        })
    }
}

/// The structure of a boolean `nrows × ncols` matrix: which entries exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    nrows: usize,
    ncols: usize,
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
}

impl Pattern {
    /// An `nrows × ncols` pattern with no entries.
    pub fn empty(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            col_ptr: vec![0; ncols + 1],
            row_idx: Vec::new(),
        }
    }

    /// Builds a pattern from compressed arrays.
    ///
    /// # Errors
    /// Returns [`BcError::MalformedCsc`] if the arrays are inconsistent.
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
    ) -> Result<Self, BcError> {
        validate_structure(nrows, ncols, &col_ptr, &row_idx)?;
        Ok(Self {
            nrows,
            ncols,
            col_ptr,
            row_idx,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.row_idx.len()
    }

    /// Returns `true` if the pattern has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_idx.is_empty()
    }

    /// Sorted rows present in column `j`.
    #[inline]
    pub fn column(&self, j: usize) -> &[usize] {
        &self.row_idx[self.col_ptr[j]..self.col_ptr[j + 1]]
    }

    /// Column offsets.
    #[inline]
    pub fn col_ptr(&self) -> &[usize] {
        &self.col_ptr
    }

    /// Returns `true` if `(i, j)` is present.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.column(j).binary_search(&i).is_ok()
    }
}

fn validate_structure(
    nrows: usize,
    ncols: usize,
    col_ptr: &[usize],
    row_idx: &[usize],
) -> Result<(), BcError> {
    if col_ptr.len() != ncols + 1 {
        return Err(BcError::MalformedCsc("col_ptr must have length ncols+1"));
    }
    if col_ptr[0] != 0 {
        return Err(BcError::MalformedCsc("col_ptr must start at 0"));
    }
    if col_ptr.windows(2).any(|w| w[0] > w[1]) {
        return Err(BcError::MalformedCsc("col_ptr must be monotone"));
    }
    if col_ptr[ncols] != row_idx.len() {
        return Err(BcError::MalformedCsc("col_ptr last must equal row_idx length"));
    }
    for w in col_ptr.windows(2) {
        let rows = &row_idx[w[0]..w[1]];
        if rows.windows(2).any(|p| p[0] >= p[1]) {
            return Err(BcError::MalformedCsc("rows must be strictly increasing within a column"));
        }
        if rows.last().is_some_and(|&r| r >= nrows) {
            return Err(BcError::MalformedCsc("row index out of range"));
        }
    }
    Ok(())
}
