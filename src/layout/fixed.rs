//! Fixed (frozen) columns and rows.
//!
//! Fixed indices are usually a leading prefix of their axis. A provider
//! predicate may also pin indices past the prefix; those are kept as a
//! sorted list of pinned indices. Both stay stationary on screen while the
//! rest of the content scrolls underneath.

use crate::types::{IndexPath, Point, VisibleRange};

/// How one axis declares its fixed indices
#[derive(Default)]
pub struct AxisFixedSpec<'a> {
    /// Explicit on/off switch; `Some(false)` disables fixing entirely
    pub has_fixed: Option<bool>,
    /// Explicit number of fixed leading indices
    pub count: Option<usize>,
    /// Per-index predicate; takes precedence over `count`
    pub predicate: Option<&'a dyn Fn(usize) -> bool>,
}

/// Fixed indices of one axis after resolution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedAxis {
    /// Length of the fixed leading run
    pub prefix: usize,
    /// Fixed indices past the prefix, ascending
    pub pinned: Vec<usize>,
}

impl AxisFixedSpec<'_> {
    /// Resolve against an axis of `axis_count` indices, clamping to it.
    pub fn resolve(&self, axis_count: usize, axis: &str) -> ResolvedAxis {
        if self.has_fixed == Some(false) {
            return ResolvedAxis::default();
        }
        if let Some(predicate) = self.predicate {
            let prefix = (0..axis_count).take_while(|&i| predicate(i)).count();
            let pinned: Vec<usize> = (prefix..axis_count).filter(|&i| predicate(i)).collect();
            if !pinned.is_empty() {
                log::debug!("{} {axis}s pinned past the fixed prefix of {prefix}", pinned.len());
            }
            return ResolvedAxis { prefix, pinned };
        }
        let requested = if let Some(count) = self.count {
            count
        } else if self.has_fixed == Some(true) {
            1
        } else {
            0
        };

        if requested > axis_count {
            log::warn!(
                "fixed {axis} count {requested} exceeds {axis} count {axis_count}; clamping"
            );
        }
        ResolvedAxis {
            prefix: requested.min(axis_count),
            pinned: Vec::new(),
        }
    }
}

/// Rendering band of a realized view, in increasing z-order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Band {
    /// Regular cells that scroll on both axes
    Scrolling,
    /// Cells of fixed columns in scrolling rows
    FixedColumn,
    /// Cells of fixed rows
    FixedRow,
    /// Cells where fixed rows and fixed columns intersect
    Corner,
    /// Column header views of scrolling columns
    Header,
    /// Column header views of fixed columns
    FixedHeader,
}

impl Band {
    /// Drawing order; higher values are drawn above lower ones
    pub fn z_index(self) -> u8 {
        match self {
            Band::Scrolling => 0,
            Band::FixedColumn => 1,
            Band::FixedRow => 2,
            Band::Corner => 3,
            Band::Header => 4,
            Band::FixedHeader => 5,
        }
    }
}

/// The ranges that need realized views along one axis for one pass.
///
/// `fixed`, `pinned` and `scrolling` never overlap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AxisBands {
    /// Fixed prefix indices the scroll window doesn't already cover
    pub fixed: VisibleRange,
    /// Pinned indices past the prefix that lie outside the scroll window, ascending
    pub pinned: Vec<usize>,
    /// Indices intersecting the scroll window
    pub scrolling: VisibleRange,
}

impl AxisBands {
    pub fn contains(&self, index: usize) -> bool {
        self.fixed.contains(index)
            || self.scrolling.contains(index)
            || self.pinned.binary_search(&index).is_ok()
    }

    /// Smallest single range covering every band
    pub fn hull(&self) -> VisibleRange {
        self.pinned
            .iter()
            .fold(self.fixed.hull(&self.scrolling), |hull, &index| {
                hull.hull(&VisibleRange::new(index, 1))
            })
    }

    pub fn len(&self) -> usize {
        self.fixed.length + self.pinned.len() + self.scrolling.length
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed indices first, then pinned ones, then the scrolling ones
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.fixed
            .iter()
            .chain(self.pinned.iter().copied())
            .chain(self.scrolling.iter())
    }
}

/// Resolved fixed configuration of the table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixedRegion {
    fixed_columns: usize,
    fixed_rows: usize,
    /// Fixed columns past the prefix, ascending
    pinned_columns: Vec<usize>,
    /// Fixed rows past the prefix, ascending
    pinned_rows: Vec<usize>,
    column_count: usize,
    row_count: usize,
    /// Whether the provider wants the corner pinned on both axes
    pin_corner: bool,
}

impl FixedRegion {
    /// Fixed prefixes are clamped to the axis counts.
    pub fn new(
        fixed_columns: usize,
        fixed_rows: usize,
        column_count: usize,
        row_count: usize,
    ) -> Self {
        if fixed_columns > column_count {
            log::warn!(
                "fixed column count {fixed_columns} exceeds column count {column_count}; clamping"
            );
        }
        if fixed_rows > row_count {
            log::warn!("fixed row count {fixed_rows} exceeds row count {row_count}; clamping");
        }
        Self {
            fixed_columns: fixed_columns.min(column_count),
            fixed_rows: fixed_rows.min(row_count),
            pinned_columns: Vec::new(),
            pinned_rows: Vec::new(),
            column_count,
            row_count,
            pin_corner: true,
        }
    }

    /// Pin individual columns past the fixed prefix.
    ///
    /// Indices inside the prefix or beyond the column count are dropped.
    #[must_use]
    pub fn with_pinned_columns(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.pinned_columns = normalize_pinned(indices, self.fixed_columns, self.column_count);
        self
    }

    /// Pin individual rows past the fixed prefix
    #[must_use]
    pub fn with_pinned_rows(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.pinned_rows = normalize_pinned(indices, self.fixed_rows, self.row_count);
        self
    }

    /// Set whether the intersection of fixed rows and columns is its own pinned band
    #[must_use]
    pub fn with_pinned_corner(mut self, pin_corner: bool) -> Self {
        self.pin_corner = pin_corner;
        self
    }

    /// Length of the fixed leading run of columns
    pub fn fixed_column_count(&self) -> usize {
        self.fixed_columns
    }

    /// Length of the fixed leading run of rows
    pub fn fixed_row_count(&self) -> usize {
        self.fixed_rows
    }

    pub fn pinned_columns(&self) -> &[usize] {
        &self.pinned_columns
    }

    pub fn pinned_rows(&self) -> &[usize] {
        &self.pinned_rows
    }

    pub fn is_fixed_column(&self, index: usize) -> bool {
        index < self.fixed_columns || self.pinned_columns.binary_search(&index).is_ok()
    }

    pub fn is_fixed_row(&self, index: usize) -> bool {
        index < self.fixed_rows || self.pinned_rows.binary_search(&index).is_ok()
    }

    /// Every fixed column, prefix first
    pub fn fixed_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.fixed_columns).chain(self.pinned_columns.iter().copied())
    }

    /// Every fixed row, prefix first
    pub fn fixed_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.fixed_rows).chain(self.pinned_rows.iter().copied())
    }

    pub fn has_fixed_columns(&self) -> bool {
        self.fixed_columns > 0 || !self.pinned_columns.is_empty()
    }

    pub fn has_fixed_rows(&self) -> bool {
        self.fixed_rows > 0 || !self.pinned_rows.is_empty()
    }

    /// Both fixed columns and fixed rows are configured
    pub fn is_fixed_column_row(&self) -> bool {
        self.has_fixed_columns() && self.has_fixed_rows()
    }

    /// The corner is rendered only in its own band, never in the fixed-row
    /// or fixed-column bands
    pub fn is_strict_fixed_column_row(&self) -> bool {
        self.is_fixed_column_row() && self.pin_corner
    }

    /// Fixed columns in relation to `range`.
    ///
    /// With `unique == false` this is `range ∩ [0, fixed)`. With `unique == true`
    /// it is the fixed columns `range` does not already cover.
    pub fn fixed_columns_range_for_range(&self, range: VisibleRange, unique: bool) -> VisibleRange {
        fixed_range_for_range(self.fixed_columns, range, unique)
    }

    /// Row counterpart of [`Self::fixed_columns_range_for_range`]
    pub fn fixed_rows_range_for_range(&self, range: VisibleRange, unique: bool) -> VisibleRange {
        fixed_range_for_range(self.fixed_rows, range, unique)
    }

    /// Split a scroll-window column range into non-overlapping bands
    pub fn column_bands(&self, window: VisibleRange) -> AxisBands {
        split_bands(self.fixed_columns, &self.pinned_columns, window)
    }

    /// Split a scroll-window row range into non-overlapping bands
    pub fn row_bands(&self, window: VisibleRange) -> AxisBands {
        split_bands(self.fixed_rows, &self.pinned_rows, window)
    }

    /// Band a cell is realized in
    pub fn band_for(&self, path: IndexPath) -> Band {
        match (self.is_fixed_row(path.row), self.is_fixed_column(path.column)) {
            (true, true) if self.pin_corner => Band::Corner,
            (true, _) => Band::FixedRow,
            (false, true) => Band::FixedColumn,
            (false, false) => Band::Scrolling,
        }
    }

    /// Band of a column header view
    pub fn header_band(&self, index: usize) -> Band {
        if self.is_fixed_column(index) {
            Band::FixedHeader
        } else {
            Band::Header
        }
    }

    /// Offset that keeps a cell stationary on screen for the given scroll offset.
    ///
    /// Without a pinned corner, cells in the intersection are pinned vertically only.
    pub fn cell_anchor(&self, path: IndexPath, scroll: Point) -> Point {
        let band = self.band_for(path);
        let x = match band {
            Band::Corner | Band::FixedColumn => scroll.x,
            _ => 0.0,
        };
        let y = match band {
            Band::Corner | Band::FixedRow => scroll.y,
            _ => 0.0,
        };
        Point::new(x, y)
    }

    /// Offset for a column header view; the header band is always pinned vertically
    pub fn column_anchor(&self, index: usize, scroll: Point) -> Point {
        let x = if self.is_fixed_column(index) {
            scroll.x
        } else {
            0.0
        };
        Point::new(x, scroll.y)
    }
}

fn fixed_range_for_range(fixed: usize, range: VisibleRange, unique: bool) -> VisibleRange {
    let prefix = VisibleRange::new(0, fixed);
    let overlap = prefix.intersection(&range);
    if !unique {
        return overlap;
    }
    if overlap.is_empty() {
        prefix
    } else if overlap.start == 0 {
        VisibleRange::from_bounds(overlap.end(), fixed)
    } else if overlap.end() == fixed {
        VisibleRange::from_bounds(0, overlap.start)
    } else {
        // `range` sits strictly inside the prefix; keep the whole prefix and let
        // the caller drop the overlap from its scrolling band.
        prefix
    }
}

fn normalize_pinned(
    indices: impl IntoIterator<Item = usize>,
    prefix: usize,
    axis_count: usize,
) -> Vec<usize> {
    let mut pinned: Vec<usize> = indices
        .into_iter()
        .filter(|&i| i >= prefix && i < axis_count)
        .collect();
    pinned.sort_unstable();
    pinned.dedup();
    pinned
}

fn split_bands(fixed: usize, pinned: &[usize], window: VisibleRange) -> AxisBands {
    let fixed_band = fixed_range_for_range(fixed, window, true);
    let scrolling = if fixed_band.intersection(&window).is_empty() {
        window
    } else {
        VisibleRange::from_bounds(window.start.max(fixed_band.end()), window.end())
    };
    let pinned = pinned
        .iter()
        .copied()
        .filter(|&i| !scrolling.contains(i) && !fixed_band.contains(i))
        .collect();
    AxisBands {
        fixed: fixed_band,
        pinned,
        scrolling,
    }
}
