//! Tap handling and hit testing.
//!
//! Points are in viewport space: `(0, 0)` is the top-left corner of the
//! visible area. Pinned bands are tested where they are drawn, so a tap on a
//! fixed row hits that row regardless of the vertical scroll offset.

use serde::Serialize;

use super::{cell_frame, column_frame, CellView, TableView};
use crate::layout::Band;
use crate::types::{IndexPath, Point, Rect};

/// What a tap landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TapTarget {
    Column { index: usize },
    Cell { path: IndexPath },
    None,
}

/// Deduplicated lookup candidates: the index drawn pinned at the point, then
/// the one scrolled under it
fn candidates(pinned: Option<usize>, scrolled: Option<usize>) -> impl Iterator<Item = usize> {
    let scrolled = scrolled.filter(|&s| Some(s) != pinned);
    pinned.into_iter().chain(scrolled)
}

impl<V: CellView> TableView<V> {
    /// Frame as drawn on screen for the current scroll offset
    fn on_screen(&self, frame: Rect) -> Rect {
        frame.offset_by(-self.viewport.scroll_x, -self.viewport.scroll_y)
    }

    /// Resolve a viewport point to a column header or a cell.
    ///
    /// The header band is drawn above every cell band; within the cells the
    /// band with the highest z-order wins.
    pub fn hit_test(&self, point: Point) -> TapTarget {
        let viewport = Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height);
        if !viewport.contains(point) {
            return TapTarget::None;
        }
        let layout = self.layout();
        let content = self.viewport.to_content(point);
        let scroll = self.viewport.offset();

        if layout.columns_height() > 0.0 {
            let header = candidates(layout.col_at_x(point.x), layout.col_at_x(content.x))
                .filter(|&index| {
                    self.on_screen(column_frame(layout, &self.fixed, index, scroll))
                        .contains(point)
                })
                .max_by_key(|&index| self.fixed.header_band(index).z_index());
            if let Some(index) = header {
                return TapTarget::Column { index };
            }
        }

        self.index_path_for_point(point)
            .map_or(TapTarget::None, |path| TapTarget::Cell { path })
    }

    /// Index path of the cell drawn at a viewport point, if any
    pub fn index_path_for_point(&self, point: Point) -> Option<IndexPath> {
        let layout = self.layout();
        let content = self.viewport.to_content(point);
        let scroll = self.viewport.offset();

        let rows: Vec<usize> =
            candidates(layout.row_at_y(point.y), layout.row_at_y(content.y)).collect();
        let columns: Vec<usize> =
            candidates(layout.col_at_x(point.x), layout.col_at_x(content.x)).collect();

        rows.iter()
            .flat_map(|&row| columns.iter().map(move |&column| IndexPath::new(row, column)))
            .filter(|&path| {
                self.on_screen(cell_frame(layout, &self.fixed, path, scroll))
                    .contains(point)
            })
            .max_by_key(|&path| self.fixed.band_for(path).z_index())
    }

    /// Band of the realized view at a viewport point
    pub fn band_at(&self, point: Point) -> Option<Band> {
        match self.hit_test(point) {
            TapTarget::Column { index } => Some(self.fixed.header_band(index)),
            TapTarget::Cell { path } => Some(self.fixed.band_for(path)),
            TapTarget::None => None,
        }
    }

    /// Hit-test a tap and forward it to the delegate's tap handlers.
    ///
    /// Passes requested by the handler through [`super::PassRequests`] run
    /// after it returns.
    pub fn tap_at(&mut self, point: Point) -> TapTarget {
        let target = self.hit_test(point);
        match target {
            TapTarget::Column { index } => {
                if let Some(handler) = self.delegate.tap_column.as_mut() {
                    handler(index, &mut self.requests);
                }
            }
            TapTarget::Cell { path } => {
                if let Some(handler) = self.delegate.tap_cell.as_mut() {
                    handler(path, &mut self.requests);
                }
            }
            TapTarget::None => log::debug!("tap at ({}, {}) hit nothing", point.x, point.y),
        }
        self.drain_requests();
        target
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
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::layout::Viewport;
    use crate::source::{TableDataSource, TableDelegate};
    use crate::view::TextCell;

    struct Grid;

    impl TableDataSource for Grid {
        fn column_count(&self) -> usize {
            5
        }

        fn row_count(&self) -> usize {
            100
        }
    }

    fn table(delegate: TableDelegate<TextCell>) -> TableView<TextCell> {
        let delegate = delegate
            .with_column_width(50.0)
            .with_row_height(20.0)
            .with_columns_height(30.0);
        let mut table = TableView::new(Viewport::new(200.0, 100.0))
            .with_data_source(Grid)
            .with_delegate(delegate);
        table.reload_data();
        table
    }

    #[test]
    fn test_header_band_is_hit_first() {
        let table = table(TableDelegate::new());
        assert_eq!(table.hit_test(Point::new(60.0, 10.0)), TapTarget::Column { index: 1 });
        assert_eq!(
            table.hit_test(Point::new(60.0, 35.0)),
            TapTarget::Cell {
                path: IndexPath::new(0, 1)
            }
        );
    }

    #[test]
    fn test_header_stays_pinned_while_scrolling() {
        let mut table = table(TableDelegate::new());
        table.scroll_by(0.0, 200.0);
        assert_eq!(table.hit_test(Point::new(10.0, 10.0)), TapTarget::Column { index: 0 });
        // 35 + 200 - 30 = 205 -> row 10
        assert_eq!(
            table.index_path_for_point(Point::new(10.0, 35.0)),
            Some(IndexPath::new(10, 0))
        );
    }

    #[test]
    fn test_fixed_row_is_hit_where_drawn() {
        let mut table = table(TableDelegate::new().with_fixed(1, 1));
        table.scroll_by(40.0, 200.0);
        assert_eq!(
            table.index_path_for_point(Point::new(10.0, 35.0)),
            Some(IndexPath::new(0, 0))
        );
        assert_eq!(table.band_at(Point::new(10.0, 35.0)), Some(Band::Corner));
        // x 70 + 40 = 110 -> column 2, in the fixed row
        assert_eq!(
            table.index_path_for_point(Point::new(70.0, 35.0)),
            Some(IndexPath::new(0, 2))
        );
        assert_eq!(table.band_at(Point::new(70.0, 35.0)), Some(Band::FixedRow));
        assert_eq!(
            table.index_path_for_point(Point::new(10.0, 60.0)),
            Some(IndexPath::new(11, 0))
        );
        assert_eq!(table.band_at(Point::new(10.0, 60.0)), Some(Band::FixedColumn));
    }

    #[test]
    fn test_points_outside_viewport_hit_nothing() {
        let table = table(TableDelegate::new());
        assert_eq!(table.hit_test(Point::new(-1.0, 50.0)), TapTarget::None);
        assert_eq!(table.hit_test(Point::new(10.0, 100.0)), TapTarget::None);
    }

    #[test]
    fn test_tap_forwards_to_delegate() {
        let taps = Rc::new(RefCell::new(Vec::new()));
        let columns = Rc::new(RefCell::new(Vec::new()));
        let cell_log = Rc::clone(&taps);
        let column_log = Rc::clone(&columns);
        let delegate = TableDelegate::new()
            .with_tap_cell(move |path, _| cell_log.borrow_mut().push(path))
            .with_tap_column(move |index, _| column_log.borrow_mut().push(index));
        let mut table = table(delegate);

        table.tap_at(Point::new(110.0, 55.0));
        table.tap_at(Point::new(160.0, 5.0));
        assert_eq!(*taps.borrow(), vec![IndexPath::new(1, 2)]);
        assert_eq!(*columns.borrow(), vec![3]);
    }

    #[test]
    fn test_tap_handler_can_request_reload() {
        let reloads = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&reloads);
        let delegate = TableDelegate::new()
            .with_tap_cell(|_, requests| requests.request_reload())
            .with_update_complete(move |update_all, _| {
                if update_all {
                    *counter.borrow_mut() += 1;
                }
            });
        let mut table = table(delegate);
        assert_eq!(*reloads.borrow(), 1);
        table.tap_at(Point::new(10.0, 40.0));
        assert_eq!(*reloads.borrow(), 2);
    }
}
