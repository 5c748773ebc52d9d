//! One level of the multi-source breadth-first search.
//!
//! The step is `frontier<!paths, replace> = Aᵀ +.second frontier`: each unreached
//! `(i, j)` adjacent to the frontier receives the sum of the path counts of its
//! frontier predecessors in column `j`. Both strategies add a target's
//! contributions in increasing predecessor order, so their results match bit for
//! bit.

use std::time::Instant;

use tracing::debug;

use crate::centrality::history::DepthHistory;
use crate::centrality::schedule::{execute, Direction, LevelStep, Plan, Pull, Push};
use crate::centrality::store::PathStore;
use crate::error::{try_filled, try_with_capacity, BcError};
use crate::graph::Adjacency;
use crate::numeric::PathCount;
use crate::parallel::map_columns;
use crate::sparse::{CscMatrix, SparseAccumulator};

/// Computes the next frontier from the current one.
pub trait FrontierStep<T: PathCount> {
    /// Which strategy this is.
    fn direction(&self) -> Direction;

    /// Returns the frontier of the next depth.
    ///
    /// `paths` must already include `frontier`; its pattern is the complement
    /// mask, so no pair that already has a path is ever rediscovered.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if a workspace or the result cannot be
    /// allocated.
    fn advance(
        &self,
        adjacency: &Adjacency,
        frontier: &CscMatrix<T>,
        paths: &PathStore<T>,
    ) -> Result<CscMatrix<T>, BcError>;
}

impl<T: PathCount> FrontierStep<T> for Push {
    fn direction(&self) -> Direction {
        Direction::Push
    }

    /// Scatters each frontier entry along the out-edges of its node.
    fn advance(
        &self,
        adjacency: &Adjacency,
        frontier: &CscMatrix<T>,
        paths: &PathStore<T>,
    ) -> Result<CscMatrix<T>, BcError> {
        let n = adjacency.node_count();
        let columns = map_columns(
            frontier.ncols(),
            || SparseAccumulator::new(n, T::zero()),
            |acc, j| {
                let reached = paths.column(j);
                let (rows, vals) = frontier.column(j);
                for (&p, &count) in rows.iter().zip(vals) {
                    for &i in adjacency.out_neighbors(p) {
                        if !reached.has_path(i) {
                            acc.add(i, count);
                        }
                    }
                }
                acc.drain_sorted()
            },
        )?;
        CscMatrix::from_columns(n, columns)
    }
}

impl<T: PathCount> FrontierStep<T> for Pull {
    fn direction(&self) -> Direction {
        Direction::Pull
    }

    /// Gathers, for each unreached node, the counts of its in-neighbors on the
    /// frontier.
    fn advance(
        &self,
        adjacency: &Adjacency,
        frontier: &CscMatrix<T>,
        paths: &PathStore<T>,
    ) -> Result<CscMatrix<T>, BcError> {
        let n = adjacency.node_count();
        let columns = map_columns(
            frontier.ncols(),
            || {
                Ok((
                    SparseAccumulator::new(n, T::zero())?,
                    SparseAccumulator::new(n, T::zero())?,
                ))
            },
            |(current, found): &mut (SparseAccumulator<T>, SparseAccumulator<T>), j| {
                let (rows, vals) = frontier.column(j);
                if rows.is_empty() {
                    return Ok((Vec::new(), Vec::new()));
                }
                current.load(rows, vals);
                for i in paths.column(j).missing(n) {
                    for &p in adjacency.in_neighbors(i) {
                        if let Some(count) = current.get(p) {
                            found.add(i, count);
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

/// Seeds the first frontier: `frontier<!paths> = A(sources, :)ᵀ`.
///
/// Column `j` holds a count of one for every out-neighbor of `sources[j]` that
/// has no path yet; with freshly seeded paths that excludes only a self-loop.
///
/// # Errors
/// Returns [`BcError::OutOfMemory`] if the frontier cannot be allocated.
pub fn seed_frontier<T: PathCount>(
    adjacency: &Adjacency,
    sources: &[usize],
    paths: &PathStore<T>,
) -> Result<CscMatrix<T>, BcError> {
    let mut columns = try_with_capacity(sources.len())?;
    for (j, &s) in sources.iter().enumerate() {
        let reached = paths.column(j);
        let neighbors = adjacency.out_neighbors(s);
        let mut rows = try_with_capacity(neighbors.len())?;
        rows.extend(neighbors.iter().copied().filter(|&i| !reached.has_path(i)));
        let vals = try_filled(rows.len(), T::one())?;
        columns.push((rows, vals));
    }
    CscMatrix::from_columns(adjacency.node_count(), columns)
}

/// Records `frontier` as the next level, absorbs it, and multiplies with the
/// strategy `planner` picks from the frontier and the updated paths.
pub(crate) fn step<T, F>(
    planner: F,
    adjacency: &Adjacency,
    frontier: &CscMatrix<T>,
    paths: &mut PathStore<T>,
    history: &mut DepthHistory,
) -> Result<LevelStep<CscMatrix<T>>, BcError>
where
    T: PathCount,
    F: FnOnce(&CscMatrix<T>, &PathStore<T>) -> Plan,
{
    let t = Instant::now();
    let level = history.append(frontier.pattern()?)?;
    paths.absorb(frontier)?;
    let other = t.elapsed();

    let paths: &PathStore<T> = paths;
    let outcome = execute(
        planner(frontier, paths),
        || Push.advance(adjacency, frontier, paths),
        || Pull.advance(adjacency, frontier, paths),
    )?;
    debug!(
        level,
        frontier = frontier.nnz(),
        next = outcome.result.nnz(),
        direction = ?outcome.direction,
        push = ?outcome.push,
        pull = ?outcome.pull,
        "forward level"
    );
    Ok(LevelStep {
        level,
        operand_nnz: frontier.nnz(),
        outcome,
        other,
    })
}

/// Runs one forward iteration with a single strategy.
///
/// Records the frontier's pattern as the next history level, absorbs it into
/// `paths` (which must happen before the multiply reads the mask), then
/// returns the next frontier. An empty result ends the search.
///
/// # Errors
/// Returns [`BcError::OutOfMemory`] if the history, the path store, or the next
/// frontier cannot be allocated.
pub fn advance<T: PathCount>(
    direction: Direction,
    adjacency: &Adjacency,
    frontier: &CscMatrix<T>,
    paths: &mut PathStore<T>,
    history: &mut DepthHistory,
) -> Result<CscMatrix<T>, BcError> {
    let level = step(|_, _| Plan::Only(direction), adjacency, frontier, paths, history)?;
    Ok(level.outcome.result)
}
