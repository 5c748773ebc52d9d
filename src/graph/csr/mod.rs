//! A compact CSR (compressed sparse row) boolean pattern.
//!
//! CSR is the standard sparse matrix format for graphs, storing edges in row-major order.
//! Row `u` of an adjacency pattern lists the out-neighbors of `u`; row `v` of its
//! transpose lists the in-neighbors of `v`.
//!
//! Memory layout:
//! - `offsets`: `Vec<usize>` of length `rows + 1` (row offsets)
//! - `indices`: column indices, sorted and de-duplicated within each row

use crate::error::{try_filled, try_with_capacity, BcError};

/// Pattern of a sparse `rows × cols` matrix in CSR form.
///
/// Only the structure is kept: the betweenness multiply reads the second operand's
/// values and ignores the adjacency's, so edge weights would be dead weight here.
///
/// ### Performance Characteristics
/// | Operation | Complexity | Notes |
/// |-----------|------------|-------|
/// | `from_adjacency` | \(O(n + m \log d)\) | Sorts and de-duplicates each row |
/// | `neighbors` | \(O(1)\) | Returns the row as a slice |
/// | `degree` | \(O(1)\) | Row length |
/// | `has_edge` | \(O(\log d)\) | Binary search of the sorted row |
/// | `transpose` | \(O(n + m)\) | Counting sort by column |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrPattern {
    offsets: Vec<usize>,
    indices: Vec<usize>,
    cols: usize,
}

impl CsrPattern {
    /// Builds a square pattern from an adjacency list.
    ///
    /// Repeated targets in a row collapse into a single entry.
    ///
    /// # Errors
    /// Returns [`BcError::EdgeOutOfRange`] if any target is `>= adjacency.len()`,
    /// or [`BcError::OutOfMemory`] if the compressed arrays cannot be allocated.
    pub fn from_adjacency(adjacency: &[Vec<usize>]) -> Result<Self, BcError> {
        let n = adjacency.len();

        let mut offsets = try_with_capacity(n + 1)?;
        offsets.push(0);
        let mut indices = try_with_capacity(adjacency.iter().map(Vec::len).sum())?;

        let mut row = Vec::new();
        for (u, nbrs) in adjacency.iter().enumerate() {
            if let Some(&v) = nbrs.iter().find(|&&v| v >= n) {
                return Err(BcError::EdgeOutOfRange {
                    from: u,
                    to: v,
                    node_count: n,
                });
            }
            row.clear();
            row.extend_from_slice(nbrs);
            row.sort_unstable();
            row.dedup();
            indices.extend_from_slice(&row);
            offsets.push(indices.len());
        }

        Ok(Self {
            offsets,
            indices,
            cols: n,
        })
    }

    /// Builds a square `n × n` pattern from an edge list.
    ///
    /// # Errors
    /// Returns [`BcError::EdgeOutOfRange`] if an endpoint is `>= n`, or
    /// [`BcError::OutOfMemory`] if `n` rows cannot be allocated.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self, BcError> {
        let mut adjacency = try_filled(n, Vec::new())?;
        for &(u, v) in edges {
            if u >= n || v >= n {
                return Err(BcError::EdgeOutOfRange {
                    from: u,
                    to: v,
                    node_count: n,
                });
            }
            adjacency[u].push(v);
        }
        Self::from_adjacency(&adjacency)
    }

    /// Builds a pattern directly from CSR parts.
    ///
    /// The matrix has `offsets.len() - 1` rows and `cols` columns, so non-square
    /// inputs can be represented (and later rejected by [`Adjacency`](crate::Adjacency)).
    ///
    /// # Errors
    /// Returns [`BcError::MalformedCsc`] if the offsets are empty, not monotone,
    /// do not end at `indices.len()`, or a row is not strictly increasing, and
    /// [`BcError::EdgeOutOfRange`] if an index is `>= cols`.
    pub fn from_csr_parts(
        offsets: Vec<usize>,
        indices: Vec<usize>,
        cols: usize,
    ) -> Result<Self, BcError> {
        if offsets.is_empty() {
            return Err(BcError::MalformedCsc("offsets must have length rows+1"));
        }
        if offsets[0] != 0 {
            return Err(BcError::MalformedCsc("offsets must start at 0"));
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(BcError::MalformedCsc("offsets must be monotone"));
        }
        if offsets[offsets.len() - 1] != indices.len() {
            return Err(BcError::MalformedCsc("offsets last must equal indices length"));
        }
        for (u, w) in offsets.windows(2).enumerate() {
            let row = &indices[w[0]..w[1]];
            if row.windows(2).any(|p| p[0] >= p[1]) {
                return Err(BcError::MalformedCsc("row indices must be strictly increasing"));
            }
            if let Some(&v) = row.iter().find(|&&v| v >= cols) {
                return Err(BcError::EdgeOutOfRange {
                    from: u,
                    to: v,
                    node_count: cols,
                });
            }
        }
        Ok(Self {
            offsets,
            indices,
            cols,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        // `offsets` is length `rows + 1` by construction.
        self.offsets.len() - 1
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of nodes of a square pattern (same as [`rows`](Self::rows)).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.rows()
    }

    /// Number of stored entries (edges).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the sorted column indices of `row`.
    ///
    /// # Panics
    /// Panics if `row >= self.rows()`.
    #[inline]
    pub fn neighbors(&self, row: usize) -> &[usize] {
        assert!(row < self.rows(), "row {row} out of bounds");
        &self.indices[self.offsets[row]..self.offsets[row + 1]]
    }

    /// Returns the number of entries in `row`.
    #[inline]
    pub fn degree(&self, row: usize) -> usize {
        assert!(row < self.rows(), "row {row} out of bounds");
        self.offsets[row + 1] - self.offsets[row]
    }

    /// Checks if the entry `(from, to)` is present.
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        assert!(from < self.rows(), "from vertex {from} out of bounds");
        assert!(to < self.cols, "to vertex {to} out of bounds");
        self.neighbors(from).binary_search(&to).is_ok()
    }

    /// Counts the entries on the main diagonal (self-loops).
    pub fn self_loop_count(&self) -> usize {
        (0..self.rows().min(self.cols))
            .filter(|&u| self.has_edge(u, u))
            .count()
    }

    /// Builds the transposed pattern.
    ///
    /// Rows of the result come out sorted because the input rows are scanned in
    /// increasing order.
    pub fn transpose(&self) -> Self {
        let rows = self.rows();
        let mut counts = vec![0usize; self.cols];
        for &v in &self.indices {
            counts[v] += 1;
        }

        let mut offsets = Vec::with_capacity(self.cols + 1);
        offsets.push(0);
        for &c in &counts {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + c);
        }

        let mut indices = vec![0usize; self.indices.len()];
        let mut write_pos = offsets[..self.cols].to_vec();
        for u in 0..rows {
            for &v in self.neighbors(u) {
                indices[write_pos[v]] = u;
                write_pos[v] += 1;
            }
        }

        Self {
            offsets,
            indices,
            cols: rows,
        }
    }

    /// Returns the underlying CSR arrays `(offsets, indices)`.
    pub fn csr_parts(&self) -> (&[usize], &[usize]) {
        (&self.offsets, &self.indices)
    }
}

#[cfg(test)]
mod tests;
