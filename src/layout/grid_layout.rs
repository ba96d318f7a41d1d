//! Pre-computed geometry for the table.
//!
//! Column and row positions are computed once per layout build so that
//! bounds lookups are O(1) and position-to-index lookups are O(log n).

use crate::types::{IndexPath, Rect, Size, VisibleRange};

/// Default column width in points, used when the delegate supplies none
pub const DEFAULT_COLUMN_WIDTH: f32 = 100.0;

/// Default row height in points, used when the delegate supplies none
pub const DEFAULT_ROW_HEIGHT: f32 = 44.0;

/// Default height of the column header band
pub const DEFAULT_COLUMNS_HEIGHT: f32 = 44.0;

/// Largest column or row count the table lays out; larger counts are clamped
pub const MAX_AXIS_COUNT: usize = 1 << 22;

/// Raw sizes the layout is built from.
///
/// Values are sanitized by [`GridLayout::new`]: negative or non-finite sizes
/// become zero and are reported through `log::warn!`.
#[derive(Debug, Clone, Default)]
pub struct GridMetrics {
    pub column_widths: Vec<f32>,
    pub row_heights: Vec<f32>,
    /// Height of the column header band (0 when the header is hidden)
    pub columns_height: f32,
    /// Space around the whole table
    pub padding: f32,
    /// Space between adjacent columns and between adjacent rows
    pub item_margin: f32,
}

/// Prefix-sum table for one axis
#[derive(Debug, Clone, Default)]
pub struct AxisLayout {
    /// `positions[i]` = leading edge of item i; one trailing entry past the last item
    positions: Vec<f32>,
    sizes: Vec<f32>,
    origin: f32,
    margin: f32,
}

impl AxisLayout {
    fn new(sizes: Vec<f32>, origin: f32, margin: f32) -> Self {
        let mut positions = Vec::with_capacity(sizes.len() + 1);
        let mut pos = origin;
        for size in &sizes {
            positions.push(pos);
            pos += size + margin;
        }
        positions.push(pos);

        Self {
            positions,
            sizes,
            origin,
            margin,
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// `(position, size)` of an item; zero-sized at the origin when out of range
    pub fn bounds(&self, index: usize) -> (f32, f32) {
        match (self.positions.get(index), self.sizes.get(index)) {
            (Some(&pos), Some(&size)) => (pos, size),
            _ => (self.origin, 0.0),
        }
    }

    pub fn size(&self, index: usize) -> f32 {
        self.sizes.get(index).copied().unwrap_or(0.0)
    }

    /// Trailing edge of the last item (the origin when the axis is empty)
    pub fn end(&self) -> f32 {
        if self.sizes.is_empty() {
            return self.origin;
        }
        self.positions
            .last()
            .map_or(self.origin, |last| last - self.margin)
    }

    /// Trailing edge of the first `count` items (the origin when `count == 0`)
    pub fn end_of_prefix(&self, count: usize) -> f32 {
        if count == 0 {
            return self.origin;
        }
        let (pos, size) = self.bounds(count.min(self.len()).saturating_sub(1));
        pos + size
    }

    /// Indices whose half-open extent `[pos, pos + size)` intersects `[lo, hi)`.
    pub fn range_in(&self, lo: f32, hi: f32) -> VisibleRange {
        if self.sizes.is_empty() || hi <= lo {
            return VisibleRange::EMPTY;
        }
        // Item ends and starts are both non-decreasing, so two binary searches bound the span.
        let first = partition_by(self.len(), |i| {
            let (pos, size) = self.bounds(i);
            pos + size <= lo
        });
        let end = partition_by(self.len(), |i| self.bounds(i).0 < hi);
        let range = VisibleRange::from_bounds(first, end);
        // Zero-sized items at the edges never intersect anything.
        self.trim_empty_edges(range)
    }

    fn trim_empty_edges(&self, range: VisibleRange) -> VisibleRange {
        let mut start = range.start;
        let mut end = range.end();
        while start < end && self.size(start) <= 0.0 {
            start += 1;
        }
        while end > start && self.size(end - 1) <= 0.0 {
            end -= 1;
        }
        VisibleRange::from_bounds(start, end)
    }

    /// Find the item containing `pos` (binary search).
    ///
    /// Positions inside padding or a margin gap belong to no item.
    pub fn index_at(&self, pos: f32) -> Option<usize> {
        if self.sizes.is_empty() || pos < self.origin {
            return None;
        }
        let index = match self
            .positions
            .binary_search_by(|p| p.partial_cmp(&pos).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        // Zero-sized items share a position with their successor; step past them.
        let mut index = index;
        while index + 1 < self.len() && self.size(index) <= 0.0 {
            index += 1;
        }
        let (start, size) = self.bounds(index);
        (index < self.len() && pos >= start && pos < start + size).then_some(index)
    }
}

/// Number of leading indices in `0..len` for which `pred` holds.
///
/// `pred` must be monotonic (a run of `true` followed by a run of `false`).
fn partition_by(len: usize, mut pred: impl FnMut(usize) -> bool) -> usize {
    let (mut lo, mut hi) = (0, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Pre-computed layout data for the table
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    columns: AxisLayout,
    rows: AxisLayout,
    padding: f32,
    item_margin: f32,
    columns_height: f32,
    content_size: Size,
}

fn sanitize_extent(value: f32, what: &str, index: Option<usize>) -> f32 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }
    match index {
        Some(i) => log::warn!("{what} at index {i} is invalid ({value}); using 0"),
        None => log::warn!("{what} is invalid ({value}); using 0"),
    }
    0.0
}

fn sanitize_sizes(sizes: Vec<f32>, what: &str) -> Vec<f32> {
    sizes
        .into_iter()
        .enumerate()
        .map(|(i, v)| sanitize_extent(v, what, Some(i)))
        .collect()
}

impl GridLayout {
    /// Build a layout from raw metrics
    pub fn new(metrics: GridMetrics) -> Self {
        let padding = sanitize_extent(metrics.padding, "table padding", None);
        let item_margin = sanitize_extent(metrics.item_margin, "item margin", None);
        let columns_height = sanitize_extent(metrics.columns_height, "columns height", None);
        let column_widths = sanitize_sizes(metrics.column_widths, "column width");
        let row_heights = sanitize_sizes(metrics.row_heights, "row height");

        let columns = AxisLayout::new(column_widths, padding, item_margin);
        let rows = AxisLayout::new(row_heights, padding + columns_height, item_margin);

        let mut layout = Self {
            columns,
            rows,
            padding,
            item_margin,
            columns_height,
            content_size: Size::ZERO,
        };
        layout.content_size = layout.calculate_content_size();
        layout
    }

    fn calculate_content_size(&self) -> Size {
        Size::new(
            self.columns.end() + self.padding,
            self.rows.end() + self.padding,
        )
    }

    /// Widen every column evenly so the table fills `width`.
    ///
    /// Does nothing when the content is already at least that wide.
    pub fn stretch_to_width(&mut self, width: f32) {
        let count = self.columns.len();
        if count == 0 || !width.is_finite() || self.content_size.width >= width {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let extra = (width - self.content_size.width) / count as f32;
        let sizes = self.columns.sizes.iter().map(|w| w + extra).collect();
        self.columns = AxisLayout::new(sizes, self.padding, self.item_margin);
        self.content_size = self.calculate_content_size();
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> &AxisLayout {
        &self.columns
    }

    pub fn rows(&self) -> &AxisLayout {
        &self.rows
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn item_margin(&self) -> f32 {
        self.item_margin
    }

    /// Height of the column header band
    pub fn columns_height(&self) -> f32 {
        self.columns_height
    }

    /// `(x, width)` of a column in content coordinates
    pub fn column_bounds(&self, index: usize) -> (f32, f32) {
        self.columns.bounds(index)
    }

    /// `(y, height)` of a row in content coordinates (below the header band)
    pub fn row_bounds(&self, index: usize) -> (f32, f32) {
        self.rows.bounds(index)
    }

    pub fn column_width(&self, index: usize) -> f32 {
        self.columns.size(index)
    }

    pub fn row_height(&self, index: usize) -> f32 {
        self.rows.size(index)
    }

    /// Header rectangle for a column, shifted by `x_offset`
    pub fn column_rect(&self, index: usize, x_offset: f32) -> Rect {
        let (x, width) = self.column_bounds(index);
        let height = if index < self.column_count() {
            self.columns_height
        } else {
            0.0
        };
        Rect::new(x + x_offset, self.padding, width, height)
    }

    /// Cell rectangle, shifted by the given offsets
    pub fn cell_rect(&self, path: IndexPath, x_offset: f32, y_offset: f32) -> Rect {
        let (x, width) = self.column_bounds(path.column);
        let (y, height) = self.row_bounds(path.row);
        Rect::new(x + x_offset, y + y_offset, width, height)
    }

    /// Total scrollable extent, including padding on both sides
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Find the column at a content x position (binary search)
    pub fn col_at_x(&self, x: f32) -> Option<usize> {
        self.columns.index_at(x)
    }

    /// Find the row at a content y position (binary search)
    pub fn row_at_y(&self, y: f32) -> Option<usize> {
        self.rows.index_at(y)
    }

    /// Columns intersecting the horizontal span `[lo, hi)`
    pub fn columns_in_span(&self, lo: f32, hi: f32) -> VisibleRange {
        self.columns.range_in(lo, hi)
    }

    /// Rows intersecting the vertical span `[lo, hi)`
    pub fn rows_in_span(&self, lo: f32, hi: f32) -> VisibleRange {
        self.rows.range_in(lo, hi)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn uniform(columns: usize, rows: usize, width: f32, height: f32) -> GridMetrics {
        GridMetrics {
            column_widths: vec![width; columns],
            row_heights: vec![height; rows],
            ..GridMetrics::default()
        }
    }

    #[test]
    fn test_basic_layout() {
        let layout = GridLayout::new(uniform(5, 10, 50.0, 20.0));

        assert_eq!(layout.column_count(), 5);
        assert_eq!(layout.row_count(), 10);
        assert_eq!(layout.content_size(), Size::new(250.0, 200.0));
    }

    #[test]
    fn test_margins_only_between_items() {
        let layout = GridLayout::new(GridMetrics {
            padding: 10.0,
            item_margin: 2.0,
            ..uniform(3, 2, 50.0, 20.0)
        });

        assert_eq!(layout.column_bounds(0), (10.0, 50.0));
        assert_eq!(layout.column_bounds(1), (62.0, 50.0));
        assert_eq!(layout.column_bounds(2), (114.0, 50.0));
        // 10 + 3*50 + 2*2 + 10
        assert_eq!(layout.content_size().width, 174.0);
        // 10 + 2*20 + 1*2 + 10
        assert_eq!(layout.content_size().height, 62.0);
    }

    #[test]
    fn test_rows_start_below_header() {
        let layout = GridLayout::new(GridMetrics {
            columns_height: 30.0,
            padding: 5.0,
            ..uniform(2, 3, 50.0, 20.0)
        });

        assert_eq!(layout.row_bounds(0), (35.0, 20.0));
        assert_eq!(layout.row_bounds(2), (75.0, 20.0));
        assert_eq!(layout.content_size().height, 5.0 + 30.0 + 60.0 + 5.0);
        assert_eq!(layout.column_rect(1, 0.0), Rect::new(55.0, 5.0, 50.0, 30.0));
    }

    #[test]
    fn test_empty_axes() {
        let layout = GridLayout::new(GridMetrics {
            padding: 8.0,
            ..GridMetrics::default()
        });

        assert_eq!(layout.content_size(), Size::new(16.0, 16.0));
        assert!(layout.columns_in_span(0.0, 500.0).is_empty());
        assert_eq!(layout.col_at_x(10.0), None);
    }

    #[test]
    fn test_out_of_range_bounds_are_zero_sized() {
        let layout = GridLayout::new(uniform(3, 3, 50.0, 20.0));
        assert_eq!(layout.column_width(3), 0.0);
        assert_eq!(layout.row_height(99), 0.0);
        assert_eq!(layout.column_rect(7, 0.0).width, 0.0);
        assert_eq!(layout.column_rect(7, 0.0).height, 0.0);
    }

    #[test]
    fn test_invalid_sizes_are_clamped() {
        let layout = GridLayout::new(GridMetrics {
            column_widths: vec![-10.0, f32::NAN, 40.0],
            row_heights: vec![f32::INFINITY],
            padding: -3.0,
            ..GridMetrics::default()
        });

        assert_eq!(layout.column_width(0), 0.0);
        assert_eq!(layout.column_width(1), 0.0);
        assert_eq!(layout.column_width(2), 40.0);
        assert_eq!(layout.row_height(0), 0.0);
        assert_eq!(layout.padding(), 0.0);
    }

    #[test]
    fn test_columns_in_span() {
        let layout = GridLayout::new(uniform(5, 1, 50.0, 20.0));

        assert_eq!(layout.columns_in_span(0.0, 200.0), VisibleRange::new(0, 4));
        assert_eq!(layout.columns_in_span(25.0, 125.0), VisibleRange::new(0, 3));
        assert_eq!(layout.columns_in_span(50.0, 100.0), VisibleRange::new(1, 1));
        assert_eq!(layout.columns_in_span(0.0, 10_000.0), VisibleRange::new(0, 5));
        assert!(layout.columns_in_span(300.0, 400.0).is_empty());
        assert!(layout.columns_in_span(100.0, 100.0).is_empty());
    }

    #[test]
    fn test_span_skips_margin_only_overlap() {
        let layout = GridLayout::new(GridMetrics {
            item_margin: 10.0,
            ..uniform(4, 1, 50.0, 20.0)
        });
        // Column 0 ends at 50, column 1 starts at 60.
        assert_eq!(layout.columns_in_span(52.0, 58.0), VisibleRange::EMPTY);
        assert_eq!(layout.columns_in_span(52.0, 61.0), VisibleRange::new(1, 1));
    }

    #[test]
    fn test_col_at_x() {
        let layout = GridLayout::new(uniform(5, 1, 50.0, 20.0));

        assert_eq!(layout.col_at_x(0.0), Some(0));
        assert_eq!(layout.col_at_x(49.9), Some(0));
        assert_eq!(layout.col_at_x(50.0), Some(1));
        assert_eq!(layout.col_at_x(249.0), Some(4));
        assert_eq!(layout.col_at_x(250.0), None);
        assert_eq!(layout.col_at_x(-1.0), None);
    }

    #[test]
    fn test_row_at_y_in_margin_gap() {
        let layout = GridLayout::new(GridMetrics {
            item_margin: 4.0,
            ..uniform(1, 3, 50.0, 20.0)
        });

        assert_eq!(layout.row_at_y(19.0), Some(0));
        assert_eq!(layout.row_at_y(22.0), None);
        assert_eq!(layout.row_at_y(24.0), Some(1));
    }

    #[test]
    fn test_index_at_skips_zero_sized_items() {
        let layout = GridLayout::new(GridMetrics {
            column_widths: vec![50.0, 0.0, 0.0, 50.0],
            ..GridMetrics::default()
        });

        assert_eq!(layout.col_at_x(50.0), Some(3));
        assert_eq!(layout.columns_in_span(0.0, 60.0), VisibleRange::new(0, 4));
        assert_eq!(layout.columns_in_span(50.0, 60.0), VisibleRange::new(3, 1));
    }

    #[test]
    fn test_stretch_fills_viewport() {
        let mut layout = GridLayout::new(uniform(4, 1, 50.0, 20.0));
        layout.stretch_to_width(400.0);

        assert_eq!(layout.column_width(0), 100.0);
        assert_eq!(layout.content_size().width, 400.0);

        // Never shrinks
        layout.stretch_to_width(100.0);
        assert_eq!(layout.content_size().width, 400.0);
    }

    #[test]
    fn test_end_of_prefix() {
        let layout = GridLayout::new(GridMetrics {
            padding: 10.0,
            item_margin: 2.0,
            ..uniform(3, 1, 50.0, 20.0)
        });
        assert_eq!(layout.columns().end_of_prefix(0), 10.0);
        assert_eq!(layout.columns().end_of_prefix(1), 60.0);
        assert_eq!(layout.columns().end_of_prefix(2), 112.0);
        assert_eq!(layout.columns().end_of_prefix(9), 164.0);
    }
}
