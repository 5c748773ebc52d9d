//! Error type shared by every fallible operation in the crate.

use core::fmt;

/// Fatal conditions that abort a betweenness run.
///
/// Input problems are reported before any work starts. Allocation failures can
/// surface mid-run; by then every intermediate buffer is an owned value, so
/// returning the error drops all of them and nothing partial escapes.
#[derive(Debug, Clone, PartialEq)]
pub enum BcError {
    /// The adjacency has a different number of rows and columns.
    NotSquare {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },
    /// The supplied transpose is not the transpose of the supplied adjacency.
    TransposeMismatch,
    /// An edge endpoint is outside `[0, n)`.
    EdgeOutOfRange {
        /// Tail of the edge.
        from: usize,
        /// Head of the edge.
        to: usize,
        /// Node count of the graph.
        node_count: usize,
    },
    /// A source index is outside `[0, n)`.
    SourceOutOfRange {
        /// Offending node index.
        source: usize,
        /// Node count of the graph.
        node_count: usize,
    },
    /// The same node was listed twice as a source.
    DuplicateSource(usize),
    /// A configuration value is out of range.
    InvalidConfig(&'static str),
    /// Compressed parts handed to an import are inconsistent.
    MalformedCsc(&'static str),
    /// A buffer could not be allocated.
    OutOfMemory {
        /// Number of elements requested.
        requested: usize,
    },
}

impl fmt::Display for BcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSquare { rows, cols } => {
                write!(f, "adjacency must be square, got {rows}x{cols}")
            }
            Self::TransposeMismatch => f.write_str("transposed adjacency does not match adjacency"),
            Self::EdgeOutOfRange { from, to, node_count } => {
                write!(f, "edge {from}->{to} is out of bounds for n={node_count}")
            }
            Self::SourceOutOfRange { source, node_count } => {
                write!(f, "source {source} out of range for n={node_count}")
            }
            Self::DuplicateSource(s) => write!(f, "source {s} listed more than once"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::MalformedCsc(msg) => write!(f, "malformed compressed column parts: {msg}"),
            Self::OutOfMemory { requested } => {
                write!(f, "memory allocation failed ({requested} elements)")
            }
        }
    }
}

impl std::error::Error for BcError {}

/// Allocates a vector of `len` copies of `value`, reporting failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, BcError> {
    let mut v = try_with_capacity(len)?;
    v.resize(len, value);
    Ok(v)
}

/// An empty vector with room for exactly `len` elements.
pub(crate) fn try_with_capacity<T>(len: usize) -> Result<Vec<T>, BcError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| BcError::OutOfMemory { requested: len })?;
    Ok(v)
}

/// Copies a slice into a new, exactly sized vector.
pub(crate) fn try_copied<T: Copy>(src: &[T]) -> Result<Vec<T>, BcError> {
    let mut v = try_with_capacity(src.len())?;
    v.extend_from_slice(src);
    Ok(v)
}
