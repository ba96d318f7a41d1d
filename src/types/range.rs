//! Contiguous index spans along one axis of the grid.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A `(start, length)` span of column or row indices.
///
/// An empty range always normalizes to `start == 0` so two empty ranges
/// compare equal regardless of how they were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start: usize,
    pub length: usize,
}

impl VisibleRange {
    pub const EMPTY: VisibleRange = VisibleRange {
        start: 0,
        length: 0,
    };

    pub fn new(start: usize, length: usize) -> Self {
        if length == 0 {
            return Self::EMPTY;
        }
        Self { start, length }
    }

    /// Build from a half-open `[start, end)` pair. `end <= start` yields an empty range.
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self::new(start, end.saturating_sub(start))
    }

    /// One past the last index
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }

    /// Overlap of two ranges (empty if disjoint)
    #[must_use]
    pub fn intersection(&self, other: &VisibleRange) -> VisibleRange {
        Self::from_bounds(self.start.max(other.start), self.end().min(other.end()))
    }

    /// Smallest range covering both. Empty inputs are ignored.
    #[must_use]
    pub fn hull(&self, other: &VisibleRange) -> VisibleRange {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::from_bounds(self.start.min(other.start), self.end().max(other.end()))
    }

    /// Trim the range so it never reaches past `count`
    #[must_use]
    pub fn clamp_to(&self, count: usize) -> VisibleRange {
        Self::from_bounds(self.start.min(count), self.end().min(count))
    }

    pub fn iter(&self) -> Range<usize> {
        self.start..self.end()
    }
}

impl IntoIterator for VisibleRange {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Range<usize>> for VisibleRange {
    fn from(range: Range<usize>) -> Self {
        Self::from_bounds(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_normalizes() {
        assert_eq!(VisibleRange::new(12, 0), VisibleRange::EMPTY);
        assert_eq!(VisibleRange::from_bounds(8, 3), VisibleRange::EMPTY);
        assert!(VisibleRange::from_bounds(4, 4).is_empty());
    }

    #[test]
    fn test_intersection() {
        let a = VisibleRange::new(0, 5);
        let b = VisibleRange::new(3, 10);
        assert_eq!(a.intersection(&b), VisibleRange::new(3, 2));
        assert!(a.intersection(&VisibleRange::new(5, 2)).is_empty());
    }

    #[test]
    fn test_hull_ignores_empty() {
        let a = VisibleRange::new(0, 1);
        let b = VisibleRange::new(10, 4);
        assert_eq!(a.hull(&b), VisibleRange::new(0, 14));
        assert_eq!(VisibleRange::EMPTY.hull(&b), b);
        assert_eq!(b.hull(&VisibleRange::EMPTY), b);
    }

    #[test]
    fn test_clamp_to_count() {
        assert_eq!(VisibleRange::new(3, 10).clamp_to(5), VisibleRange::new(3, 2));
        assert!(VisibleRange::new(7, 2).clamp_to(5).is_empty());
    }

    #[test]
    fn test_iterates_indices() {
        let indices: Vec<usize> = VisibleRange::new(2, 3).into_iter().collect();
        assert_eq!(indices, vec![2, 3, 4]);
    }
}
