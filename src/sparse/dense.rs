//! Contiguous column-major dense storage.
//!
//! Element `(row, col)` lives at `col * nrows + row`, which is the same order a
//! full compressed-column matrix stores its values in. That makes the export and
//! import below a move of the value buffer rather than a copy, and lets each
//! column be handed to a different worker as a disjoint `&mut [T]`.

use num_traits::Zero;

use crate::error::{try_filled, BcError};
use crate::sparse::csc::{CscMatrix, CscParts};

/// A dense `nrows × ncols` matrix in column-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T: Copy> DenseMatrix<T> {
    /// Creates a matrix with every element set to `value`.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the buffer cannot be allocated.
    pub fn filled(nrows: usize, ncols: usize, value: T) -> Result<Self, BcError> {
        let len = nrows
            .checked_mul(ncols)
            .ok_or(BcError::OutOfMemory { requested: usize::MAX })?;
        Ok(Self {
            data: try_filled(len, value)?,
            nrows,
            ncols,
        })
    }

    /// Creates a matrix from a column-major vector.
    ///
    /// # Panics
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_vec(data: Vec<T>, nrows: usize, ncols: usize) -> Self {
        assert_eq!(data.len(), nrows * ncols, "Vector length must match dimensions");
        Self { data, nrows, ncols }
    }

    /// Returns the number of rows.
    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns.
    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns the element at `(row, col)`.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.nrows && col < self.ncols {
            Some(self.data[col * self.nrows + row])
        } else {
            None
        }
    }

    /// Returns column `col` as a slice.
    #[inline]
    pub fn column(&self, col: usize) -> &[T] {
        &self.data[col * self.nrows..(col + 1) * self.nrows]
    }

    /// Returns column `col` as a mutable slice.
    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        &mut self.data[col * self.nrows..(col + 1) * self.nrows]
    }

    /// Iterates the columns as disjoint mutable slices.
    ///
    /// A matrix with zero rows yields no columns.
    pub fn columns_mut(&mut self) -> impl Iterator<Item = &mut [T]> + '_ {
        self.data.chunks_exact_mut(self.nrows.max(1))
    }

    /// The whole buffer in column-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The whole buffer in column-major order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Exports as a full compressed-column matrix.
    ///
    /// Every position becomes an entry, in column-major order. The value buffer
    /// is moved, not copied.
    pub fn export_csc(self) -> CscParts<T> {
        let n = self.nrows;
        let col_ptr = (0..=self.ncols).map(|j| j * n).collect();
        let row_idx = (0..self.ncols).flat_map(|_| 0..n).collect();
        CscParts {
            nrows: n,
            ncols: self.ncols,
            col_ptr,
            row_idx,
            values: self.data,
        }
    }
}

impl<T: Copy + Zero> DenseMatrix<T> {
    /// Imports compressed-column parts.
    ///
    /// A full pattern (as produced by [`export_csc`](Self::export_csc)) adopts the
    /// value buffer directly; anything sparser is scattered into a zeroed buffer.
    ///
    /// # Errors
    /// Returns [`BcError::MalformedCsc`] for inconsistent parts and
    /// [`BcError::OutOfMemory`] if the dense buffer cannot be allocated.
    pub fn import_csc(parts: CscParts<T>) -> Result<Self, BcError> {
        let (nrows, ncols) = (parts.nrows, parts.ncols);
        let csc = CscMatrix::from_parts(parts)?;
        if csc.nnz() == nrows * ncols {
            // Strictly increasing rows in range make a full column exactly 0..nrows.
            let parts = csc.into_parts();
            return Ok(Self {
                data: parts.values,
                nrows,
                ncols,
            });
        }
        Self::from_sparse(&csc)
    }

    /// Scatters a sparse matrix into a new dense buffer; absent entries are zero.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the dense buffer cannot be allocated.
    pub fn from_sparse(csc: &CscMatrix<T>) -> Result<Self, BcError> {
        let mut dense = Self::filled(csc.nrows(), csc.ncols(), T::zero())?;
        for (i, j, v) in csc.iter() {
            dense.data[j * csc.nrows() + i] = v;
        }
        Ok(dense)
    }
}
