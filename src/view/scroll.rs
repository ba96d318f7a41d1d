//! Scroll and resize entry points.
//!
//! Each call moves the viewport and runs one incremental pass, so only the
//! columns and cells crossing the viewport edges are realized or retired.

use std::sync::Arc;

use super::{CellView, PassReport, TableView};
use crate::layout::Viewport;
use crate::types::{Point, Size};

impl<V: CellView> TableView<V> {
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current scroll offset in content coordinates
    pub fn content_offset(&self) -> Point {
        self.viewport.offset()
    }

    /// Scroll to an absolute offset, clamped to the content
    pub fn set_content_offset(&mut self, offset: Point) -> PassReport {
        let layout = Arc::clone(self.layout_arc());
        self.viewport.set_scroll(offset.x, offset.y, &layout);
        self.update_content_size()
    }

    /// Scroll by a delta, clamped to the content
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32) -> PassReport {
        let layout = Arc::clone(self.layout_arc());
        self.viewport.scroll_by(delta_x, delta_y, &layout);
        self.update_content_size()
    }

    /// Change the viewport size.
    ///
    /// Stretched tables re-lay out their columns to the new width.
    pub fn resize(&mut self, size: Size) -> PassReport {
        self.viewport.resize(size.width, size.height);
        if self.config.stretch_table {
            self.invalidate_layout();
        }
        self.update_content_size()
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
    use crate::source::{TableDataSource, TableDelegate};
    use crate::types::IndexPath;
    use crate::view::TextCell;

    struct Grid(usize, usize);

    impl TableDataSource for Grid {
        fn column_count(&self) -> usize {
            self.0
        }

        fn row_count(&self) -> usize {
            self.1
        }
    }

    fn table(columns: usize, rows: usize) -> TableView<TextCell> {
        let delegate = TableDelegate::new()
            .with_column_width(50.0)
            .with_row_height(20.0)
            .with_columns_height(0.0);
        let mut table = TableView::new(Viewport::new(200.0, 100.0))
            .with_data_source(Grid(columns, rows))
            .with_delegate(delegate);
        table.reload_data();
        table
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let mut table = table(5, 100);
        table.set_content_offset(Point::new(-10.0, 1.0e9));
        let offset = table.content_offset();
        assert_eq!(offset.x, 0.0);
        assert_eq!(offset.y, 2000.0 - 100.0);
    }

    #[test]
    fn test_scroll_by_retires_rows_that_left() {
        let mut table = table(5, 100);
        let report = table.scroll_by(0.0, 40.0);
        assert!(report.retired_cells.iter().all(|p| p.row < 2));
        assert!(report.realized_cells.iter().all(|p| p.row >= 5));
        assert!(table.cell_at(IndexPath::new(0, 0)).is_none());
        assert!(table.cell_at(IndexPath::new(6, 0)).is_some());
    }

    #[test]
    fn test_zero_delta_is_a_noop() {
        let mut table = table(5, 100);
        let report = table.scroll_by(0.0, 0.0);
        assert!(report.is_noop());
    }

    #[test]
    fn test_resize_grows_the_visible_window() {
        let mut table = table(10, 100);
        assert_eq!(table.visible_columns_range().end(), 4);
        let report = table.resize(Size::new(400.0, 100.0));
        assert_eq!(table.visible_columns_range().end(), 8);
        assert!(report.realized_cells.iter().any(|p| p.column == 7));
    }

    #[test]
    fn test_resize_restretches_columns() {
        let mut table = table(2, 3);
        table.set_stretch_table(true);
        assert_eq!(table.column_width_at_index(0), 100.0);
        table.resize(Size::new(400.0, 100.0));
        assert_eq!(table.column_width_at_index(0), 200.0);
        assert_eq!(table.content_size().width, 400.0);
    }
}
