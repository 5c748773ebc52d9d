//! Per-depth discovery patterns recorded by the forward phase.

use core::ops::Index;

use crate::error::BcError;
use crate::sparse::Pattern;

/// Append-only list of discovery patterns, one per BFS level.
///
/// Level `d` holds the `(node, source)` pairs first reached at distance `d + 1`.
/// A non-empty level discovers at least one new node in some column, so a search
/// over `n` nodes never records more than `n` levels; that bound is the arena's
/// capacity. Storage grows one level at a time and is never reserved up front.
#[derive(Debug, Clone)]
pub struct DepthHistory {
    levels: Vec<Pattern>,
    capacity: usize,
}

impl DepthHistory {
    /// An empty history for a graph of `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            levels: Vec::new(),
            capacity: node_count,
        }
    }

    /// Records the next level and returns its index.
    ///
    /// # Errors
    /// Returns [`BcError::OutOfMemory`] if the level list cannot grow.
    ///
    /// # Panics
    /// Panics if the history is already at capacity or the pattern's shape
    /// differs from earlier levels; both mean the search itself is broken.
    pub fn append(&mut self, level: Pattern) -> Result<usize, BcError> {
        assert!(
            self.levels.len() < self.capacity,
            "history depth would exceed node count {}",
            self.capacity
        );
        if let Some(first) = self.levels.first() {
            assert_eq!(
                (first.nrows(), first.ncols()),
                (level.nrows(), level.ncols()),
                "history level shape mismatch"
            );
        }
        self.levels
            .try_reserve_exact(1)
            .map_err(|_| BcError::OutOfMemory { requested: 1 })?;
        self.levels.push(level);
        Ok(self.levels.len() - 1)
    }

    /// Pattern of `level`, if it has been recorded.
    #[inline]
    pub fn get(&self, level: usize) -> Option<&Pattern> {
        self.levels.get(level)
    }

    /// Number of recorded levels (the search depth).
    #[inline]
    pub fn count(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if no level was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Maximum number of levels.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots the level list has actually allocated.
    #[cfg(test)]
    pub(crate) fn allocated_levels(&self) -> usize {
        self.levels.capacity()
    }

    /// Backward transitions in replay order: `(d, level d, level d - 1)` for
    /// `d` from `count - 1` down to `1`.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, &Pattern, &Pattern)> + '_ {
        (1..self.levels.len())
            .rev()
            .map(move |d| (d, &self.levels[d], &self.levels[d - 1]))
    }
}

impl Index<usize> for DepthHistory {
    type Output = Pattern;

    fn index(&self, level: usize) -> &Pattern {
        assert!(
            level < self.levels.len(),
            "history level {level} read before it was recorded (depth {})",
            self.levels.len()
        );
        &self.levels[level]
    }
}
