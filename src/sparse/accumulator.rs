//! Dense scatter workspace for building one sparse column at a time.
//!
//! Column kernels scatter contributions into an `n`-long buffer, remember which
//! rows were touched, then gather them back out in row order. Only touched
//! slots are reset, so reusing one accumulator across columns costs nothing
//! proportional to `n`. All workspace memory is reserved up front; adding a
//! row never allocates.

use core::ops::AddAssign;

use crate::error::{try_filled, try_with_capacity, BcError};

/// A sparse accumulator over rows `0..n`.
pub struct SparseAccumulator<T> {
    values: Vec<T>,
    occupied: Vec<bool>,
    touched: Vec<usize>,
}

impl<T: Copy + AddAssign> SparseAccumulator<T> {
    /// Creates an accumulator for rows `0..n`, filling unused slots with `blank`.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the workspace cannot be allocated.
    pub fn new(n: usize, blank: T) -> Result<Self, BcError> {
        Ok(Self {
            values: try_filled(n, blank)?,
            occupied: try_filled(n, false)?,
            touched: try_with_capacity(n)?,
        })
    }

    /// Number of rows covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    /// Returns `true` if the accumulator covers no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    /// Adds `value` into `row`. The first contribution is stored as-is.
    #[inline]
    pub fn add(&mut self, row: usize, value: T) {
        if self.occupied[row] {
            self.values[row] += value;
        } else {
            self.occupied[row] = true;
            self.values[row] = value;
            // Each row is pushed once per column, so this stays within the
            // capacity reserved in `new`.
            self.touched.push(row);
        }
    }

    /// Value accumulated at `row`, if any.
    #[inline]
    pub fn get(&self, row: usize) -> Option<T> {
        self.occupied[row].then(|| self.values[row])
    }

    /// Returns `true` if `row` has received a contribution.
    #[inline]
    pub fn contains(&self, row: usize) -> bool {
        self.occupied[row]
    }

    /// Scatters a sorted sparse column.
    pub fn load(&mut self, rows: &[usize], values: &[T]) {
        for (&r, &v) in rows.iter().zip(values) {
            self.add(r, v);
        }
    }

    /// Gathers the touched rows in increasing order and resets the workspace.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the output column cannot be
    /// allocated; the workspace is reset either way.
    pub fn drain_sorted(&mut self) -> Result<(Vec<usize>, Vec<T>), BcError> {
        self.touched.sort_unstable();
        let gathered = self.gather();
        self.clear();
        gathered
    }

    fn gather(&self) -> Result<(Vec<usize>, Vec<T>), BcError> {
        let mut rows = try_with_capacity(self.touched.len())?;
        let mut values = try_with_capacity(self.touched.len())?;
        rows.extend_from_slice(&self.touched);
        values.extend(self.touched.iter().map(|&r| self.values[r]));
        Ok((rows, values))
    }

    /// Resets the workspace without gathering.
    pub fn clear(&mut self) {
        for r in self.touched.drain(..) {
            self.occupied[r] = false;
        }
    }
}
