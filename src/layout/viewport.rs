//! Viewport state: scroll offset, visible size and the visible index ranges.

use super::{AxisBands, FixedRegion, GridLayout};
use crate::types::{EdgeInsets, Point, Size, VisibleRange};

/// Viewport state - represents the visible area of the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position in content coordinates
    pub scroll_x: f32,
    /// Vertical scroll position in content coordinates
    pub scroll_y: f32,
    /// Viewport width in points
    pub width: f32,
    /// Viewport height in points
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(320.0, 480.0)
    }
}

impl Viewport {
    /// Create a viewport of the given size scrolled to the origin
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn offset(&self) -> Point {
        Point::new(self.scroll_x, self.scroll_y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Columns intersecting the scroll window, ignoring fixed columns
    pub fn window_columns(&self, layout: &GridLayout) -> VisibleRange {
        layout.columns_in_span(self.scroll_x, self.scroll_x + self.width)
    }

    /// Rows intersecting the scroll window, ignoring fixed rows
    pub fn window_rows(&self, layout: &GridLayout) -> VisibleRange {
        layout.rows_in_span(self.scroll_y, self.scroll_y + self.height)
    }

    /// Visible column range; always includes the fixed columns.
    pub fn visible_columns(&self, layout: &GridLayout, fixed: &FixedRegion) -> VisibleRange {
        self.column_bands(layout, fixed).hull()
    }

    /// Visible row range; always includes the fixed rows.
    pub fn visible_rows(&self, layout: &GridLayout, fixed: &FixedRegion) -> VisibleRange {
        self.row_bands(layout, fixed).hull()
    }

    /// Columns needing views this pass, split into fixed and scrolling bands
    pub fn column_bands(&self, layout: &GridLayout, fixed: &FixedRegion) -> AxisBands {
        fixed.column_bands(self.window_columns(layout))
    }

    /// Rows needing views this pass, split into fixed and scrolling bands
    pub fn row_bands(&self, layout: &GridLayout, fixed: &FixedRegion) -> AxisBands {
        fixed.row_bands(self.window_rows(layout))
    }

    /// Clamp scroll position so the viewport never leaves the content.
    pub fn clamp_scroll(&mut self, layout: &GridLayout) {
        let content = layout.content_size();
        let max_x = (content.width - self.width).max(0.0);
        let max_y = (content.height - self.height).max(0.0);

        // NaN offsets collapse to the origin
        self.scroll_x = if self.scroll_x.is_nan() {
            0.0
        } else {
            self.scroll_x.clamp(0.0, max_x)
        };
        self.scroll_y = if self.scroll_y.is_nan() {
            0.0
        } else {
            self.scroll_y.clamp(0.0, max_y)
        };
    }

    /// Scroll by delta amounts
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32, layout: &GridLayout) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(layout);
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f32, y: f32, layout: &GridLayout) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(layout);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Convert a viewport point to content coordinates along an unpinned axis
    pub fn to_content(&self, point: Point) -> Point {
        Point::new(point.x + self.scroll_x, point.y + self.scroll_y)
    }

    /// Insets keeping scroll indicators clear of the pinned header, rows and columns.
    ///
    /// Each edge is inset to the screen edge of the pinned content along it,
    /// padding included. An edge with nothing pinned gets no inset.
    pub fn scroll_indicator_insets(layout: &GridLayout, fixed: &FixedRegion) -> EdgeInsets {
        let top = if fixed.fixed_row_count() > 0 {
            layout.rows().end_of_prefix(fixed.fixed_row_count())
        } else if layout.columns_height() > 0.0 {
            layout.padding() + layout.columns_height()
        } else {
            0.0
        };
        let left = if fixed.fixed_column_count() > 0 {
            layout.columns().end_of_prefix(fixed.fixed_column_count())
        } else {
            0.0
        };
        EdgeInsets::new(top, left, 0.0, 0.0)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::layout::GridMetrics;

    fn layout(columns: usize, rows: usize, width: f32, height: f32) -> GridLayout {
        GridLayout::new(GridMetrics {
            column_widths: vec![width; columns],
            row_heights: vec![height; rows],
            ..GridMetrics::default()
        })
    }

    #[test]
    fn test_initial_scroll_zero() {
        let viewport = Viewport::new(200.0, 100.0);
        assert_eq!(viewport.offset(), Point::ZERO);
    }

    #[test]
    fn test_visible_ranges_include_fixed() {
        let layout = layout(20, 100, 50.0, 20.0);
        let fixed = FixedRegion::new(1, 1, 20, 100);
        let mut viewport = Viewport::new(200.0, 100.0);
        viewport.set_scroll(500.0, 1000.0, &layout);

        assert_eq!(viewport.window_columns(&layout), VisibleRange::new(10, 4));
        assert_eq!(viewport.visible_columns(&layout, &fixed), VisibleRange::new(0, 14));
        assert_eq!(viewport.window_rows(&layout), VisibleRange::new(50, 5));
        assert_eq!(viewport.visible_rows(&layout, &fixed), VisibleRange::new(0, 55));

        let bands = viewport.column_bands(&layout, &fixed);
        assert_eq!(bands.fixed, VisibleRange::new(0, 1));
        assert_eq!(bands.scrolling, VisibleRange::new(10, 4));
    }

    #[test]
    fn test_viewport_larger_than_content() {
        let layout = layout(3, 2, 50.0, 20.0);
        let viewport = Viewport::new(1000.0, 1000.0);
        let fixed = FixedRegion::default();
        assert_eq!(viewport.visible_columns(&layout, &fixed), VisibleRange::new(0, 3));
        assert_eq!(viewport.visible_rows(&layout, &fixed), VisibleRange::new(0, 2));
    }

    #[test]
    fn test_zero_sized_viewport_keeps_fixed() {
        let layout = layout(5, 5, 50.0, 20.0);
        let viewport = Viewport::new(0.0, 0.0);
        let fixed = FixedRegion::new(2, 0, 5, 5);
        assert_eq!(viewport.visible_columns(&layout, &fixed), VisibleRange::new(0, 2));
        assert!(viewport.visible_rows(&layout, &fixed).is_empty());
    }

    #[test]
    fn test_clamp_scroll() {
        let layout = layout(5, 100, 50.0, 20.0);
        let mut viewport = Viewport::new(200.0, 100.0);

        viewport.set_scroll(-50.0, -10.0, &layout);
        assert_eq!(viewport.offset(), Point::ZERO);

        viewport.set_scroll(10_000.0, 10_000.0, &layout);
        assert_eq!(viewport.scroll_x, 50.0);
        assert_eq!(viewport.scroll_y, 1900.0);

        viewport.scroll_by(-20.0, -900.0, &layout);
        assert_eq!(viewport.offset(), Point::new(30.0, 1000.0));
    }

    #[test]
    fn test_clamp_scroll_content_smaller_than_viewport() {
        let layout = layout(2, 2, 50.0, 20.0);
        let mut viewport = Viewport::new(500.0, 500.0);
        viewport.set_scroll(30.0, f32::NAN, &layout);
        assert_eq!(viewport.offset(), Point::ZERO);
    }

    #[test]
    fn test_scroll_indicator_insets() {
        let layout = GridLayout::new(GridMetrics {
            column_widths: vec![50.0; 5],
            row_heights: vec![20.0; 10],
            columns_height: 30.0,
            ..GridMetrics::default()
        });
        let none = FixedRegion::default();
        assert_eq!(
            Viewport::scroll_indicator_insets(&layout, &none),
            EdgeInsets::new(30.0, 0.0, 0.0, 0.0)
        );
        let fixed = FixedRegion::new(2, 1, 5, 10);
        assert_eq!(
            Viewport::scroll_indicator_insets(&layout, &fixed),
            EdgeInsets::new(50.0, 100.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_scroll_indicator_insets_count_padding_only_when_pinned() {
        let layout = GridLayout::new(GridMetrics {
            column_widths: vec![50.0; 5],
            row_heights: vec![20.0; 10],
            columns_height: 0.0,
            padding: 8.0,
            ..GridMetrics::default()
        });
        assert_eq!(
            Viewport::scroll_indicator_insets(&layout, &FixedRegion::default()),
            EdgeInsets::new(0.0, 0.0, 0.0, 0.0)
        );
        let fixed = FixedRegion::new(1, 1, 5, 10);
        assert_eq!(
            Viewport::scroll_indicator_insets(&layout, &fixed),
            EdgeInsets::new(28.0, 58.0, 0.0, 0.0)
        );
    }
}
