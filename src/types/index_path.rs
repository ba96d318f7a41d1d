use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a single cell in the grid.
///
/// Ordering is row-major, so sorted collections of paths walk the grid
/// the same way the table realizes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct IndexPath {
    pub row: usize,
    pub column: usize,
}

impl IndexPath {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.column)
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}
