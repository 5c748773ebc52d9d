//! # `brandes_batch` - Batched Betweenness Centrality
//!
//! Brandes betweenness centrality computed for a batch of `k` sources at once,
//! phrased as sparse matrix products over an `n × k` frontier.
//!
//! ## Overview
//!
//! Instead of one breadth-first search per source, every source is a column of
//! the same sparse matrix. A single masked product per BFS level advances all
//! searches together, and a single product per level replays the dependency
//! accumulation backwards. Running every source gives exact betweenness; a
//! sample of sources gives an estimate.
//!
//! ### Layers
//!
//! 1. **Graph** ([`graph`]): an immutable square adjacency kept in both
//!    orientations, so push steps walk out-edges and pull steps walk in-edges
//!    without transposing.
//! 2. **Sparse storage** ([`sparse`]): compressed-column matrices, patterns, a
//!    column-major dense buffer and the scatter workspace used by the kernels.
//! 3. **Centrality** ([`centrality`]): the forward search, the depth history,
//!    the path-count and dependency stores, the backward accumulation and the
//!    push/pull [`Schedule`].
//!
//! ### Invariants
//!
//! - A `(node, source)` pair enters the frontier at most once: the product is
//!   masked by the complement of the path counts discovered so far.
//! - The history records one pattern per level and never more levels than nodes.
//! - Push and pull add each target's contributions in the same order, so the
//!   strategy choice never changes a result.
//!
//! ## Example
//!
//! ```rust
//! use brandes_batch::{betweenness, Adjacency};
//!
//! // Directed 5-cycle 0 -> 1 -> 2 -> 3 -> 4 -> 0, searched from node 0.
//! let graph = Adjacency::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
//! let centrality = betweenness(&graph, &[0]).unwrap();
//! assert_eq!(centrality, vec![0.0, 3.0, 2.0, 1.0, 0.0]);
//! ```
//!
//! ## Features
//!
//! - `parallel`: runs the per-column loops on rayon's thread pool.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod centrality;
pub mod error;
pub mod graph;
pub mod numeric;
pub mod sparse;

mod parallel;

pub use centrality::report::{CostReport, LevelStat, PhaseCost};
pub use centrality::schedule::{Direction, Pull, Push, Schedule};
pub use centrality::{
    betweenness, compute_betweenness, run_forward, BcConfig, Betweenness, ForwardSearch, Sources,
};
pub use error::BcError;
pub use graph::{Adjacency, CsrPattern};
pub use numeric::PathCount;
pub use sparse::{CscMatrix, CscParts, DenseMatrix, Pattern};
