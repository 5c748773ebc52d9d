//! Batched Brandes betweenness centrality.
//!
//! A run searches from all `k` sources at once, one `n × k` sparse multiply per
//! BFS level, then replays the recorded levels backwards to accumulate
//! dependencies:
//!
//! 1. **Setup**: validate, seed `paths[s_j, j] = 1`, seed the frontier with the
//!    sources' out-neighbors.
//! 2. **Forward**: record the frontier's pattern, absorb it into `paths`, multiply
//!    to get the next frontier; stop when it is empty.
//! 3. **Backward setup**: dependencies set to one, path counts frozen dense.
//! 4. **Backward**: for each level `d` from `depth - 1` down to `1`, propagate
//!    `deps ./ paths` on level `d` to level `d - 1` and fold it back with `.* paths`.
//! 5. **Reduce**: row sums of the dependencies minus `k`.
//!
//! Every multiply can run as push or pull; [`Schedule`] picks per step.
//!
//! ## Example
//!
//! ```rust
//! use brandes_batch::{compute_betweenness, Adjacency, BcConfig, Sources};
//!
//! // 0 - 1 - 2
//! let graph = Adjacency::undirected(3, &[(0, 1), (1, 2)]).unwrap();
//! let run = compute_betweenness::<f64>(&graph, Sources::All, &BcConfig::default()).unwrap();
//! assert_eq!(run.centrality, vec![0.0, 2.0, 0.0]);
//! ```

pub mod backward;
pub mod frontier;
pub mod history;
pub mod report;
pub mod schedule;
pub mod store;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::error::{try_copied, try_filled, try_with_capacity, BcError};
use crate::graph::Adjacency;
use crate::numeric::PathCount;
use crate::sparse::CscMatrix;

use frontier::seed_frontier;
use history::DepthHistory;
use report::CostReport;
use schedule::Schedule;
use store::{DependencyStore, PathStore};

/// Tuning knobs of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BcConfig {
    /// Push/pull policy for every multiply.
    pub schedule: Schedule,
    /// Fill fraction in `[0, 1]` at which path counts switch to a dense buffer.
    /// `0.0` starts dense.
    pub dense_switch: f64,
    /// Heuristic bias: push while `push_work <= push_pull_ratio * pull_work`.
    pub push_pull_ratio: f64,
}

impl Default for BcConfig {
    fn default() -> Self {
        Self {
            schedule: Schedule::Heuristic,
            dense_switch: 0.0,
            push_pull_ratio: 1.0,
        }
    }
}

impl BcConfig {
    /// Returns the config with `schedule` replaced.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Returns the config with `dense_switch` replaced.
    #[must_use]
    pub fn with_dense_switch(mut self, dense_switch: f64) -> Self {
        self.dense_switch = dense_switch;
        self
    }

    /// Checks that every value is in range.
    ///
    /// # Errors
    /// Returns [`BcError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), BcError> {
        if !(0.0..=1.0).contains(&self.dense_switch) {
            return Err(BcError::InvalidConfig("dense_switch must be within [0, 1]"));
        }
        if !(self.push_pull_ratio.is_finite() && self.push_pull_ratio > 0.0) {
            return Err(BcError::InvalidConfig("push_pull_ratio must be positive and finite"));
        }
        Ok(())
    }
}

/// Which nodes the searches start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sources<'a> {
    /// Every node; source `i` is node `i` and `k = n`.
    All,
    /// The listed nodes, in order. They must be distinct.
    Nodes(&'a [usize]),
}

impl<'a> From<&'a [usize]> for Sources<'a> {
    fn from(nodes: &'a [usize]) -> Self {
        Self::Nodes(nodes)
    }
}

impl Sources<'_> {
    /// Expands to an explicit list, checking range and distinctness.
    ///
    /// # Errors
    /// - [`BcError::SourceOutOfRange`] for a node `>= n`
    /// - [`BcError::DuplicateSource`] for a node listed twice
    /// - [`BcError::OutOfMemory`] if the list or the duplicate check cannot be
    ///   allocated
    pub fn resolve(self, n: usize) -> Result<Vec<usize>, BcError> {
        match self {
            Self::All => {
                let mut all = try_with_capacity(n)?;
                all.extend(0..n);
                Ok(all)
            }
            Self::Nodes(nodes) => {
                let mut seen = try_filled(n, false)?;
                for &s in nodes {
                    if s >= n {
                        return Err(BcError::SourceOutOfRange {
                            source: s,
                            node_count: n,
                        });
                    }
                    if seen[s] {
                        return Err(BcError::DuplicateSource(s));
                    }
                    seen[s] = true;
                }
                try_copied(nodes)
            }
        }
    }
}

/// State left by the forward phase.
#[derive(Debug)]
pub struct ForwardSearch<T> {
    /// Resolved source list; column `j` belongs to `sources[j]`.
    pub sources: Vec<usize>,
    /// Shortest-path counts from every source to every node.
    pub paths: PathStore<T>,
    /// Discovery pattern of every level.
    pub history: DepthHistory,
    /// Costs of setup and the forward phase.
    pub report: CostReport,
}

/// Result of a betweenness run.
#[derive(Debug, Clone)]
pub struct Betweenness<T> {
    /// Centrality of every node.
    pub centrality: Vec<T>,
    /// Number of BFS levels recorded.
    pub depth: usize,
    /// Per-phase costs.
    pub report: CostReport,
}

/// Runs setup and the forward phase.
///
/// # Errors
/// Returns the validation errors of [`BcConfig::validate`] and
/// [`Sources::resolve`], or [`BcError::OutOfMemory`].
#[allow(clippy::cast_precision_loss)]
pub fn run_forward<T: PathCount>(
    adjacency: &Adjacency,
    sources: Sources<'_>,
    config: &BcConfig,
) -> Result<ForwardSearch<T>, BcError> {
    let start = Instant::now();
    config.validate()?;
    let n = adjacency.node_count();
    let sources = sources.resolve(n)?;
    let k = sources.len();

    let mut report = CostReport::default();
    let mut paths = PathStore::<T>::seeded(n, &sources, config.dense_switch)?;
    let mut frontier: CscMatrix<T> = seed_frontier(adjacency, &sources, &paths)?;
    let mut history = DepthHistory::new(n);
    report.setup = start.elapsed();

    let degree = adjacency.average_degree();
    let _span = info_span!("forward", n, k).entered();
    while !frontier.is_empty() {
        // Push walks the out-edges of the frontier, pull the in-edges of every
        // unreached pair.
        let level = frontier::step(
            |current, paths| {
                let unreached = n * k - paths.nnz();
                config.schedule.plan(
                    current.nnz() as f64 * degree,
                    unreached as f64 * degree,
                    config.push_pull_ratio,
                )
            },
            adjacency,
            &frontier,
            &mut paths,
            &mut history,
        )?;
        let stat = report.forward.record_level(&level);
        report.forward_levels.push(stat);
        frontier = level.outcome.result;
    }
    report.depth = history.count();
    info!(
        depth = report.depth,
        push = ?report.forward.push,
        pull = ?report.forward.pull,
        chosen = ?report.forward.chosen,
        other = ?report.forward.other,
        "forward phase done"
    );

    Ok(ForwardSearch {
        sources,
        paths,
        history,
        report,
    })
}

/// Computes approximate betweenness centrality from the given sources.
///
/// With [`Sources::All`] the result is exact Brandes betweenness over ordered
/// pairs (both directions counted on undirected graphs). Node `i`'s score is the
/// sum over sources `s ≠ i` and targets `t ∉ {s, i}` of the fraction of shortest
/// `s → t` paths passing through `i`.
///
/// # Errors
/// - [`BcError::InvalidConfig`] for an out-of-range config
/// - [`BcError::SourceOutOfRange`] / [`BcError::DuplicateSource`] for bad sources
/// - [`BcError::OutOfMemory`] if a buffer cannot be allocated; all buffers
///   allocated so far are released before returning
pub fn compute_betweenness<T: PathCount>(
    adjacency: &Adjacency,
    sources: Sources<'_>,
    config: &BcConfig,
) -> Result<Betweenness<T>, BcError> {
    let n = adjacency.node_count();
    let _run = info_span!("betweenness", n).entered();

    let ForwardSearch {
        sources,
        paths,
        history,
        mut report,
    } = run_forward::<T>(adjacency, sources, config)?;
    let k = sources.len();

    let t = Instant::now();
    let mut deps = DependencyStore::<T>::ones(n, k)?;
    let paths = paths.freeze()?;
    report.backward_setup = t.elapsed();

    {
        let _span = info_span!("backward", depth = history.count()).entered();
        for transition in history.transitions() {
            #[allow(clippy::cast_precision_loss)]
            let level = backward::step(
                |ratios, previous| {
                    config.schedule.plan(
                        ratios.nnz() as f64,
                        previous.nnz() as f64,
                        config.push_pull_ratio,
                    )
                },
                transition,
                &mut deps,
                &paths,
                adjacency,
            )?;
            let stat = report.backward.record_level(&level);
            report.backward_levels.push(stat);
        }
        info!(
            push = ?report.backward.push,
            pull = ?report.backward.pull,
            chosen = ?report.backward.chosen,
            other = ?report.backward.other,
            "backward phase done"
        );
    }

    let t = Instant::now();
    let centrality = deps.reduce()?;
    report.wrapup = t.elapsed();
    info!(total = ?report.total_chosen(), depth = report.depth, "betweenness done");

    Ok(Betweenness {
        centrality,
        depth: history.count(),
        report,
    })
}

/// Betweenness with the default config and `f64` counts.
///
/// # Errors
/// See [`compute_betweenness`].
pub fn betweenness(adjacency: &Adjacency, sources: &[usize]) -> Result<Vec<f64>, BcError> {
    compute_betweenness::<f64>(adjacency, Sources::Nodes(sources), &BcConfig::default())
        .map(|run| run.centrality)
}
