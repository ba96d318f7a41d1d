//! The authoritative record of which columns and cells are on screen.

use std::collections::BTreeMap;

use crate::layout::Band;
use crate::types::{IndexPath, Rect};

/// A view currently placed on screen
#[derive(Debug, Clone, PartialEq)]
pub struct RealizedView<V> {
    pub view: V,
    /// Frame in content coordinates, already anchored for fixed bands
    pub frame: Rect,
    pub band: Band,
}

/// Realized column header views and cell views.
///
/// Keyed maps guarantee each column and each index path is realized at most
/// once per pass. Ordered maps keep projections deterministic.
pub struct RealizedSet<V> {
    pub(crate) columns: BTreeMap<usize, RealizedView<V>>,
    pub(crate) cells: BTreeMap<IndexPath, RealizedView<V>>,
}

impl<V> Default for RealizedSet<V> {
    fn default() -> Self {
        Self {
            columns: BTreeMap::new(),
            cells: BTreeMap::new(),
        }
    }
}

impl<V> RealizedSet<V> {
    pub fn column(&self, index: usize) -> Option<&RealizedView<V>> {
        self.columns.get(&index)
    }

    pub fn cell(&self, path: IndexPath) -> Option<&RealizedView<V>> {
        self.cells.get(&path)
    }

    pub fn columns(&self) -> impl Iterator<Item = (usize, &RealizedView<V>)> {
        self.columns.iter().map(|(&index, entry)| (index, entry))
    }

    pub fn cells(&self) -> impl Iterator<Item = (IndexPath, &RealizedView<V>)> {
        self.cells.iter().map(|(&path, entry)| (path, entry))
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.cells.is_empty()
    }

    /// Cells of one band, in row-major order
    pub fn cells_in_band(&self, band: Band) -> impl Iterator<Item = IndexPath> + '_ {
        self.cells
            .iter()
            .filter(move |(_, entry)| entry.band == band)
            .map(|(&path, _)| path)
    }

    /// Drop everything without returning views to a pool
    pub(crate) fn clear(&mut self) {
        self.columns.clear();
        self.cells.clear();
    }
}
