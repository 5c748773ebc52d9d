//! Element type for path counts and dependency values.

use core::fmt::Debug;

use num_traits::{Float, NumAssign};

/// Real-number type used to hold shortest-path counts and dependencies.
///
/// Path counts are integers, but they overflow any integer type on large graphs
/// and the backward phase divides them, so they live in a float. `f32` halves
/// the memory of the `n × k` buffers and is exact up to 2^24 paths per entry;
/// `f64` is exact up to 2^53.
pub trait PathCount: Float + NumAssign + Debug + Send + Sync + 'static {
    /// Converts a source count into the element type.
    fn from_count(count: usize) -> Self;
}

impl PathCount for f32 {
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn from_count(count: usize) -> Self {
        count as f32
    }
}

impl PathCount for f64 {
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn from_count(count: usize) -> Self {
        count as f64
    }
}
