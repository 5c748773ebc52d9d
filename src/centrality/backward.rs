//! Dependency propagation from one BFS level to the level before it.
//!
//! For a transition from level `d` to `d - 1` the multiply is
//! `increment<S[d-1]> = A +.second ratios`, where `ratios` lives on the pattern of
//! level `d`. Every edge `u → v` with `u` on level `d - 1` and `v` on level `d`
//! of the same column lies on a shortest path, so the mask alone selects the
//! shortest-path DAG.

use std::time::Instant;

use tracing::debug;

use crate::centrality::history::DepthHistory;
use crate::centrality::schedule::{execute, Direction, LevelStep, Plan, Pull, Push};
use crate::centrality::store::DependencyStore;
use crate::error::BcError;
use crate::graph::Adjacency;
use crate::numeric::PathCount;
use crate::parallel::map_columns;
use crate::sparse::{CscMatrix, DenseMatrix, Pattern, SparseAccumulator};

/// Propagates ratios one hop against the edge direction.
pub trait BackwardStep<T: PathCount> {
    /// Which strategy this is.
    fn direction(&self) -> Direction;

    /// Returns `increment[u, j] = Σ ratios[v, j]` over successors `v` of `u`,
    /// for the `(u, j)` present in `mask`.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if a workspace or the result cannot be
    /// allocated.
    fn propagate(
        &self,
        adjacency: &Adjacency,
        ratios: &CscMatrix<T>,
        mask: &Pattern,
    ) -> Result<CscMatrix<T>, BcError>;
}

impl<T: PathCount> BackwardStep<T> for Pull {
    fn direction(&self) -> Direction {
        Direction::Pull
    }

    /// Each masked predecessor gathers over its out-edges.
    fn propagate(
        &self,
        adjacency: &Adjacency,
        ratios: &CscMatrix<T>,
        mask: &Pattern,
    ) -> Result<CscMatrix<T>, BcError> {
        let n = adjacency.node_count();
        let columns = map_columns(
            ratios.ncols(),
            || {
                Ok((
                    SparseAccumulator::new(n, T::zero())?,
                    SparseAccumulator::new(n, T::zero())?,
                ))
            },
            |(current, found): &mut (SparseAccumulator<T>, SparseAccumulator<T>), j| {
                let (rows, vals) = ratios.column(j);
                let targets = mask.column(j);
                if rows.is_empty() || targets.is_empty() {
                    return Ok((Vec::new(), Vec::new()));
                }
                current.load(rows, vals);
                for &u in targets {
                    for &v in adjacency.out_neighbors(u) {
                        if let Some(r) = current.get(v) {
                            found.add(u, r);
                        }
                    }
                }
                current.clear();
                found.drain_sorted()
            },
        )?;
        CscMatrix::from_columns(n, columns)
    }
}

impl<T: PathCount> BackwardStep<T> for Push {
    fn direction(&self) -> Direction {
        Direction::Push
    }

    /// Each ratio entry scatters over its in-edges, keeping masked predecessors.
    fn propagate(
        &self,
        adjacency: &Adjacency,
        ratios: &CscMatrix<T>,
        mask: &Pattern,
    ) -> Result<CscMatrix<T>, BcError> {
        let n = adjacency.node_count();
        let columns = map_columns(
            ratios.ncols(),
            || SparseAccumulator::new(n, T::zero()),
            |acc, j| {
                let (rows, vals) = ratios.column(j);
                let targets = mask.column(j);
                if targets.is_empty() {
                    return Ok((Vec::new(), Vec::new()));
                }
                for (&v, &r) in rows.iter().zip(vals) {
                    for &u in adjacency.in_neighbors(v) {
                        if targets.binary_search(&u).is_ok() {
                            acc.add(u, r);
                        }
                    }
                }
                acc.drain_sorted()
            },
        )?;
        CscMatrix::from_columns(n, columns)
    }
}

/// Runs one backward transition `(d, level d, level d - 1)`: ratios on level
/// `d`, a multiply with the strategy `planner` picks from the ratios and the
/// target level, then the fold into `deps`.
pub(crate) fn step<T, F>(
    planner: F,
    (level, current, previous): (usize, &Pattern, &Pattern),
    deps: &mut DependencyStore<T>,
    paths: &DenseMatrix<T>,
    adjacency: &Adjacency,
) -> Result<LevelStep<()>, BcError>
where
    T: PathCount,
    F: FnOnce(&CscMatrix<T>, &Pattern) -> Plan,
{
    let t = Instant::now();
    let ratios = deps.ratios(current, paths)?;
    let mut other = t.elapsed();

    let outcome = execute(
        planner(&ratios, previous),
        || Push.propagate(adjacency, &ratios, previous),
        || Pull.propagate(adjacency, &ratios, previous),
    )?;
    debug!(
        level,
        ratios = ratios.nnz(),
        increment = outcome.result.nnz(),
        direction = ?outcome.direction,
        "backward level"
    );

    let t = Instant::now();
    deps.fold(&outcome.result, paths);
    other += t.elapsed();

    Ok(LevelStep {
        level,
        operand_nnz: ratios.nnz(),
        outcome: outcome.map(drop),
        other,
    })
}

/// Runs the transition out of history level `level` with a single strategy.
///
/// Computes the ratios on level `level`, propagates them to level `level - 1`,
/// and folds the result into `deps`.
///
/// # Errors
/// Returns [`BcError::OutOfMemory`] if the ratios or the increment cannot be
/// allocated; `deps` is left untouched in that case.
///
/// # Panics
/// Panics if `level` is zero or was never recorded.
pub fn fold_level<T: PathCount>(
    direction: Direction,
    level: usize,
    history: &DepthHistory,
    deps: &mut DependencyStore<T>,
    paths: &DenseMatrix<T>,
    adjacency: &Adjacency,
) -> Result<(), BcError> {
    assert!(level > 0, "level 0 has no predecessor level");
    step(
        |_, _| Plan::Only(direction),
        (level, &history[level], &history[level - 1]),
        deps,
        paths,
        adjacency,
    )?;
    Ok(())
}
