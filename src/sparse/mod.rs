//! Sparse and dense `n × k` containers used by the batched search.
//!
//! - `csc`: compressed-column numeric matrices and boolean patterns
//! - `dense`: column-major dense buffers with compressed export/import
//! - `accumulator`: scatter/gather workspace for building one column

pub mod accumulator;
pub mod csc;
pub mod dense;

pub use accumulator::SparseAccumulator;
pub use csc::{CscMatrix, CscParts, Pattern};
pub use dense::DenseMatrix;

#[cfg(test)]
mod tests;
