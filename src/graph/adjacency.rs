//! The adjacency relation in both orientations.
//!
//! Push and pull steps walk the graph in opposite directions, so both `A` and `Aᵀ`
//! are kept materialized for the lifetime of the graph instead of transposing on
//! demand.

use crate::error::BcError;
use crate::graph::csr::CsrPattern;

/// An immutable square adjacency `A` (row `u` = out-neighbors of `u`) together with
/// its transpose `Aᵀ` (row `v` = in-neighbors of `v`).
#[derive(Debug, Clone)]
pub struct Adjacency {
    forward: CsrPattern,
    transposed: CsrPattern,
}

impl Adjacency {
    /// Pairs an adjacency with a caller-supplied transpose.
    ///
    /// # Errors
    /// - [`BcError::NotSquare`] if either pattern is not square
    /// - [`BcError::TransposeMismatch`] if `transposed` is not the transpose of `forward`
    pub fn new(forward: CsrPattern, transposed: CsrPattern) -> Result<Self, BcError> {
        for m in [&forward, &transposed] {
            if m.rows() != m.cols() {
                return Err(BcError::NotSquare {
                    rows: m.rows(),
                    cols: m.cols(),
                });
            }
        }
        if forward.transpose() != transposed {
            return Err(BcError::TransposeMismatch);
        }
        Ok(Self {
            forward,
            transposed,
        })
    }

    /// Wraps a pattern, computing its transpose.
    ///
    /// # Errors
    /// Returns [`BcError::NotSquare`] if the pattern is not square.
    pub fn from_pattern(forward: CsrPattern) -> Result<Self, BcError> {
        if forward.rows() != forward.cols() {
            return Err(BcError::NotSquare {
                rows: forward.rows(),
                cols: forward.cols(),
            });
        }
        let transposed = forward.transpose();
        Ok(Self {
            forward,
            transposed,
        })
    }

    /// Builds the graph from an adjacency list.
    ///
    /// # Errors
    /// Returns [`BcError::EdgeOutOfRange`] for a target outside the list.
    pub fn from_adjacency(adjacency: &[Vec<usize>]) -> Result<Self, BcError> {
        Self::from_pattern(CsrPattern::from_adjacency(adjacency)?)
    }

    /// Builds an `n`-node graph from directed edges.
    ///
    /// # Errors
    /// Returns [`BcError::EdgeOutOfRange`] for an endpoint `>= n`, or
    /// [`BcError::OutOfMemory`] if `n` rows cannot be allocated.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self, BcError> {
        Self::from_pattern(CsrPattern::from_edges(n, edges)?)
    }

    /// Builds an `n`-node graph where every edge is present in both directions.
    ///
    /// # Errors
    /// Returns [`BcError::EdgeOutOfRange`] for an endpoint `>= n`.
    pub fn undirected(n: usize, edges: &[(usize, usize)]) -> Result<Self, BcError> {
        let both: Vec<(usize, usize)> = edges
            .iter()
            .flat_map(|&(u, v)| [(u, v), (v, u)])
            .collect();
        Self::from_edges(n, &both)
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.forward.node_count()
    }

    /// Number of directed edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.forward.edge_count()
    }

    /// `A`.
    #[inline]
    pub fn forward(&self) -> &CsrPattern {
        &self.forward
    }

    /// `Aᵀ`, without copying.
    #[inline]
    pub fn transposed(&self) -> &CsrPattern {
        &self.transposed
    }

    /// Successors of `u`.
    #[inline]
    pub fn out_neighbors(&self, u: usize) -> &[usize] {
        self.forward.neighbors(u)
    }

    /// Predecessors of `v`.
    #[inline]
    pub fn in_neighbors(&self, v: usize) -> &[usize] {
        self.transposed.neighbors(v)
    }

    /// Number of self-loops.
    pub fn self_loop_count(&self) -> usize {
        self.forward.self_loop_count()
    }

    /// Mean out-degree, used by the push/pull heuristic.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_degree(&self) -> f64 {
        if self.node_count() == 0 {
            0.0
        } else {
            self.edge_count() as f64 / self.node_count() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_builds_matching_transpose() {
        let g = Adjacency::from_edges(3, &[(0, 1), (0, 2), (1, 2)]).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.out_neighbors(0), &[1, 2]);
        assert_eq!(g.in_neighbors(2), &[0, 1]);
        assert!(g.in_neighbors(0).is_empty());
    }

    #[test]
    fn adjacency_rejects_non_square() {
        let rect = CsrPattern::from_csr_parts(vec![0, 1, 1], vec![2], 3).unwrap();
        let t = rect.transpose();
        assert_eq!(
            Adjacency::new(rect.clone(), t).unwrap_err(),
            BcError::NotSquare { rows: 2, cols: 3 }
        );
        assert_eq!(
            Adjacency::from_pattern(rect).unwrap_err(),
            BcError::NotSquare { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn adjacency_rejects_wrong_transpose() {
        let a = CsrPattern::from_edges(2, &[(0, 1)]).unwrap();
        assert_eq!(
            Adjacency::new(a.clone(), a).unwrap_err(),
            BcError::TransposeMismatch
        );
    }

    #[test]
    fn undirected_inserts_both_directions() {
        let g = Adjacency::undirected(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.out_neighbors(1), &[0, 2]);
        assert_eq!(g.in_neighbors(1), &[0, 2]);
        assert_eq!(g.self_loop_count(), 0);
    }
}
