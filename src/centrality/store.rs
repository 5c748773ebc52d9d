//! Path-count and dependency accumulators.
//!
//! Both are `n × k` with one column per source. Path counts begin with one
//! entry per column and fill in as the search widens, so they start sparse and
//! switch to a dense buffer once they cross a density threshold. Dependencies are
//! dense from the start. Every representation change is an explicit call.

use tracing::debug;

use crate::error::{try_copied, try_filled, try_with_capacity, BcError};
use crate::numeric::PathCount;
use crate::parallel::{for_each_column_mut, map_columns, map_rows};
use crate::sparse::{CscMatrix, CscParts, DenseMatrix, Pattern};

#[derive(Debug, Clone)]
enum PathRepr<T> {
    Sparse(CscMatrix<T>),
    Dense(DenseMatrix<T>),
}

/// Cumulative shortest-path counts discovered so far, per `(node, source)`.
#[derive(Debug, Clone)]
pub struct PathStore<T> {
    repr: PathRepr<T>,
    nrows: usize,
    ncols: usize,
    nnz: usize,
    dense_switch: f64,
}

impl<T: PathCount> PathStore<T> {
    /// Seeds `paths[sources[j], j] = 1` for every source column `j`.
    ///
    /// `dense_switch` is the fill fraction at which the store densifies; `0.0`
    /// densifies immediately.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the seed entries or an immediate
    /// densify cannot allocate, and [`BcError::MalformedCsc`] if a source is
    /// `>= n`.
    pub fn seeded(n: usize, sources: &[usize], dense_switch: f64) -> Result<Self, BcError> {
        let k = sources.len();
        let mut col_ptr = try_with_capacity(k + 1)?;
        col_ptr.extend(0..=k);
        let seeds = CscMatrix::from_parts(CscParts {
            nrows: n,
            ncols: k,
            col_ptr,
            row_idx: try_copied(sources)?,
            values: try_filled(k, T::one())?,
        })?;
        let mut store = Self {
            repr: PathRepr::Sparse(seeds),
            nrows: n,
            ncols: k,
            nnz: k,
            dense_switch,
        };
        store.maybe_densify()?;
        Ok(store)
    }

    /// Number of rows (nodes).
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns (sources).
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of `(node, source)` pairs with at least one path.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.nnz
    }

    /// Returns `true` once the store holds a dense buffer.
    #[inline]
    pub fn is_dense(&self) -> bool {
        matches!(self.repr, PathRepr::Dense(_))
    }

    /// View of column `j`.
    #[inline]
    pub fn column(&self, j: usize) -> PathColumn<'_, T> {
        match &self.repr {
            PathRepr::Sparse(m) => PathColumn::Sparse(m.column(j).0),
            PathRepr::Dense(d) => PathColumn::Dense(d.column(j)),
        }
    }

    /// `paths += frontier`.
    ///
    /// The frontier only holds pairs that had no path yet, so every entry adds
    /// exactly one new pair.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if a triggered densify cannot allocate.
    pub fn absorb(&mut self, frontier: &CscMatrix<T>) -> Result<(), BcError> {
        assert_eq!(
            (frontier.nrows(), frontier.ncols()),
            (self.nrows, self.ncols),
            "frontier shape mismatch"
        );
        match &mut self.repr {
            PathRepr::Sparse(m) => {
                *m = m.union_add(frontier)?;
                self.nnz = m.nnz();
            }
            PathRepr::Dense(d) => {
                let n = self.nrows;
                for_each_column_mut(d.as_mut_slice(), n, |j, col| {
                    let (rows, vals) = frontier.column(j);
                    for (&i, &v) in rows.iter().zip(vals) {
                        col[i] += v;
                    }
                });
                self.nnz += frontier.nnz();
            }
        }
        self.maybe_densify()
    }

    /// Switches to the dense representation. A no-op if already dense.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the dense buffer cannot be allocated.
    pub fn densify(&mut self) -> Result<(), BcError> {
        if let PathRepr::Sparse(m) = &self.repr {
            let dense = DenseMatrix::from_sparse(m)?;
            debug!(nnz = self.nnz, n = self.nrows, k = self.ncols, "path store densified");
            self.repr = PathRepr::Dense(dense);
        }
        Ok(())
    }

    /// Consumes the store, yielding the dense path counts.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the store was still sparse and the
    /// dense buffer cannot be allocated.
    pub fn freeze(self) -> Result<DenseMatrix<T>, BcError> {
        match self.repr {
            PathRepr::Dense(d) => Ok(d),
            PathRepr::Sparse(m) => DenseMatrix::from_sparse(&m),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn maybe_densify(&mut self) -> Result<(), BcError> {
        let total = (self.nrows * self.ncols) as f64;
        if !self.is_dense() && self.nnz as f64 >= self.dense_switch * total {
            self.densify()?;
        }
        Ok(())
    }
}

/// Read-only view of one source column of a [`PathStore`].
#[derive(Debug, Clone, Copy)]
pub enum PathColumn<'a, T> {
    /// Sorted rows that have a path.
    Sparse(&'a [usize]),
    /// Path count of every row; zero means unreached.
    Dense(&'a [T]),
}

impl<'a, T: PathCount> PathColumn<'a, T> {
    /// Returns `true` if at least one shortest path to `row` is known.
    #[inline]
    pub fn has_path(&self, row: usize) -> bool {
        match self {
            Self::Sparse(rows) => rows.binary_search(&row).is_ok(),
            Self::Dense(vals) => !vals[row].is_zero(),
        }
    }

    /// Iterates, in increasing order, the rows in `0..n` with no path yet.
    pub fn missing(self, n: usize) -> MissingRows<'a, T> {
        MissingRows {
            column: self,
            next: 0,
            cursor: 0,
            n,
        }
    }
}

/// Iterator over unreached rows of a [`PathColumn`].
pub struct MissingRows<'a, T> {
    column: PathColumn<'a, T>,
    next: usize,
    cursor: usize,
    n: usize,
}

impl<T: PathCount> Iterator for MissingRows<'_, T> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.next < self.n {
            let row = self.next;
            self.next += 1;
            let reached = match self.column {
                PathColumn::Sparse(rows) => {
                    while self.cursor < rows.len() && rows[self.cursor] < row {
                        self.cursor += 1;
                    }
                    self.cursor < rows.len() && rows[self.cursor] == row
                }
                PathColumn::Dense(vals) => !vals[row].is_zero(),
            };
            if !reached {
                return Some(row);
            }
        }
        None
    }
}

/// Dependency accumulator, dense, initialised to one everywhere.
///
/// Entry `(i, j)` ends up as one plus the dependency of source `j` on node `i`.
#[derive(Debug, Clone)]
pub struct DependencyStore<T> {
    values: DenseMatrix<T>,
}

impl<T: PathCount> DependencyStore<T> {
    /// A `n × k` accumulator filled with ones.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the buffer cannot be allocated.
    pub fn ones(n: usize, k: usize) -> Result<Self, BcError> {
        Ok(Self {
            values: DenseMatrix::filled(n, k, T::one())?,
        })
    }

    /// Current values.
    #[inline]
    pub fn values(&self) -> &DenseMatrix<T> {
        &self.values
    }

    /// `ratios<level> = deps ./ paths`, restricted to the pattern of `level`.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the ratios cannot be allocated.
    ///
    /// # Panics
    /// Panics if a path count under the pattern is zero: every node in a level
    /// was reached, so a zero means the forward phase is inconsistent.
    pub fn ratios(
        &self,
        level: &Pattern,
        paths: &DenseMatrix<T>,
    ) -> Result<CscMatrix<T>, BcError> {
        let deps = &self.values;
        let columns = map_columns(
            level.ncols(),
            || Ok(()),
            |_, j| {
                let rows = try_copied(level.column(j))?;
                let dep_col = deps.column(j);
                let path_col = paths.column(j);
                let mut vals = try_with_capacity(rows.len())?;
                vals.extend(rows.iter().map(|&i| {
                    let sigma = path_col[i];
                    assert!(!sigma.is_zero(), "zero path count at ({i}, {j})");
                    dep_col[i] / sigma
                }));
                Ok((rows, vals))
            },
        )?;
        CscMatrix::from_columns(level.nrows(), columns)
    }

    /// `deps += increment .* paths` on the entries of `increment`.
    pub fn fold(&mut self, increment: &CscMatrix<T>, paths: &DenseMatrix<T>) {
        let n = self.values.nrows();
        for_each_column_mut(self.values.as_mut_slice(), n, |j, col| {
            let (rows, vals) = increment.column(j);
            let path_col = paths.column(j);
            for (&i, &v) in rows.iter().zip(vals) {
                col[i] += v * path_col[i];
            }
        });
    }

    /// Row sums across the `k` source columns, minus `k`.
    ///
    /// The subtraction removes the one every entry started with.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the result cannot be allocated.
    pub fn reduce(&self) -> Result<Vec<T>, BcError> {
        let n = self.values.nrows();
        let k = self.values.ncols();
        let data = self.values.as_slice();
        let bias = T::from_count(k);
        map_rows(n, |i| {
            let mut sum = T::zero();
            for j in 0..k {
                sum += data[j * n + i];
            }
            sum - bias
        })
    }
}
