//! Table view orchestration tests
//!
//! Tests for reload/update passes, fixed bands, view reuse, configuration
//! and pass requests made from delegate callbacks.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::collections::HashSet;

use common::*;
use gridview::layout::MAX_AXIS_COUNT;
use gridview::{
    Band, IndexPath, Point, Rect, Size, TableConfig, TableDataSource, TableDelegate, TableView,
    TextCell, UpdateState, VisibleRange, Viewport,
};

mod scenario {
    use super::*;

    #[test]
    fn test_visible_ranges_at_origin() {
        let table = scenario_table();
        assert_eq!(table.visible_columns_range(), VisibleRange::new(0, 4));
        // Rows 0..5 exactly fill the 100pt viewport. Row 5 starts at y = 100,
        // the window's exclusive end, so the minimal cover stops before it.
        assert_eq!(table.visible_rows_range(), VisibleRange::new(0, 5));
        assert_eq!(table.realized().cell_count(), 20);
        assert_eq!(table.content_size(), Size::new(250.0, 2000.0));
    }

    #[test]
    fn test_jump_scroll_retires_each_row_once() {
        let mut table = scenario_table();
        let report = table.set_content_offset(Point::new(0.0, 200.0));

        let retired_rows: HashSet<usize> = report.retired_cells.iter().map(|p| p.row).collect();
        assert_eq!(retired_rows, (1..5).collect());
        assert_eq!(report.retired_cells.len(), 16);
        assert!(report.retired_cells.iter().all(|p| p.row != 0));
        assert_eq!(report.realized_cells.len(), 20);
        assert_eq!(table.visible_rows_range(), VisibleRange::new(0, 15));
    }

    #[test]
    fn test_stepped_scroll_retires_each_row_once() {
        let mut table = scenario_table();
        let mut retired = Vec::new();
        for step in 1..=10 {
            let report = table.set_content_offset(Point::new(0.0, 20.0 * step as f32));
            retired.extend(report.retired_cells);
        }

        let unique: HashSet<IndexPath> = retired.iter().copied().collect();
        assert_eq!(unique.len(), retired.len(), "a cell was retired twice");
        let rows: HashSet<usize> = retired.iter().map(|p| p.row).collect();
        assert_eq!(rows, (1..10).collect());
        assert_eq!(retired.len(), 9 * 4);
    }

    #[test]
    fn test_fixed_row_follows_vertical_scroll() {
        let mut table = scenario_table();
        table.set_content_offset(Point::new(0.0, 200.0));

        let header_cell = table.realized().cell(IndexPath::new(0, 2)).unwrap();
        assert_eq!(header_cell.band, Band::FixedRow);
        assert_eq!(header_cell.frame, Rect::new(100.0, 200.0, 50.0, 20.0));

        let scrolled = table.realized().cell(IndexPath::new(12, 2)).unwrap();
        assert_eq!(scrolled.band, Band::Scrolling);
        assert_eq!(scrolled.frame, Rect::new(100.0, 240.0, 50.0, 20.0));
    }

    #[test]
    fn test_fixed_column_follows_horizontal_scroll() {
        let mut table = scenario_table();
        let report = table.set_content_offset(Point::new(50.0, 0.0));

        let fixed = table.realized().cell(IndexPath::new(3, 0)).unwrap();
        assert_eq!(fixed.band, Band::FixedColumn);
        assert_eq!(fixed.frame.x, 50.0);
        assert_eq!(report.repositioned, 5);
        assert_eq!(table.visible_columns_range(), VisibleRange::new(0, 5));
        assert!(table.cell_at(IndexPath::new(3, 4)).is_some());
        assert_eq!(table.realized().cell(IndexPath::new(3, 1)).unwrap().frame.x, 50.0);
    }

    #[test]
    fn test_strict_corner_is_realized_once_in_corner_band() {
        let mut table = scenario_table();
        table.set_content_offset(Point::new(50.0, 200.0));

        let corner: Vec<_> = table
            .realized()
            .cells()
            .filter(|(path, _)| *path == IndexPath::new(0, 0))
            .collect();
        assert_eq!(corner.len(), 1);
        assert_eq!(corner[0].1.band, Band::Corner);
        assert_eq!(corner[0].1.frame, Rect::new(50.0, 200.0, 50.0, 20.0));
        assert!(table.fixed_region().is_strict_fixed_column_row());
        assert_eq!(table.realized().cells_in_band(Band::Corner).count(), 1);
    }

    #[test]
    fn test_unpinned_corner_scrolls_horizontally() {
        let mut table = TableBuilder::new(5, 100)
            .delegate(|d| d.with_fixed(1, 1).with_fixed_column_row(false))
            .reloaded();
        assert!(!table.fixed_region().is_strict_fixed_column_row());
        table.set_content_offset(Point::new(30.0, 200.0));

        let corner = table.realized().cell(IndexPath::new(0, 0)).unwrap();
        assert_eq!(corner.band, Band::FixedRow);
        assert_eq!(corner.frame, Rect::new(0.0, 200.0, 50.0, 20.0));
    }

    #[test]
    fn test_zero_columns() {
        let table = TableBuilder::new(0, 10)
            .config(TableConfig {
                table_padding: 6.0,
                ..TableConfig::default()
            })
            .delegate(|d| d.with_columns_height(30.0))
            .reloaded();
        assert_eq!(table.content_size().width, 12.0);
        assert!(table.visible_columns_range().is_empty());
        assert_eq!(table.realized().column_count(), 0);
        assert_eq!(table.realized().cell_count(), 0);
    }
}

mod passes {
    use super::*;

    #[test]
    fn test_reload_is_idempotent() {
        let mut table = scenario_table();
        let first = realized_paths(&table);
        let size = table.content_size();
        let report = table.reload_data();
        assert!(report.update_all);
        assert_eq!(realized_paths(&table), first);
        assert_eq!(table.content_size(), size);
        assert!(table.pools().cells.is_empty());
    }

    #[test]
    fn test_update_without_changes_is_noop() {
        let mut table = scenario_table();
        let report = table.update_content_size();
        assert!(!report.update_all);
        assert!(report.is_noop());
        assert_eq!(table.state(), UpdateState::Realized);
    }

    #[test]
    fn test_scroll_reuses_retired_views() {
        let mut table = scenario_table();
        let report = table.set_content_offset(Point::new(0.0, 200.0));
        assert_eq!(report.reused, 16);
        assert_eq!(report.created, 4);
        assert!(table.pools().cells.is_empty());
        let reused = table.cell_at(IndexPath::new(10, 1)).unwrap();
        assert_eq!(reused.text.as_deref(), Some("10:1"));
    }

    #[test]
    fn test_clear_moves_views_into_pools() {
        let mut table = scenario_table();
        let report = table.clear();
        assert_eq!(report.retired_cells.len(), 20);
        assert!(table.realized().is_empty());
        assert_eq!(table.pools().cells.len(), 20);
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.state(), UpdateState::Idle);
        assert!(table.visible_rows_range().is_empty());
    }

    #[test]
    fn test_missing_data_source_renders_empty() {
        let mut table: TableView<gridview::TextCell> = TableView::new(Viewport::new(100.0, 100.0));
        let report = table.reload_data();
        assert!(report.is_noop());
        assert_eq!(table.column_count(), 0);
        assert!(table.cell_at(IndexPath::new(0, 0)).is_none());
    }

    #[test]
    fn test_lookup_out_of_range() {
        let table = scenario_table();
        assert!(table.cell_at(IndexPath::new(500, 0)).is_none());
        assert!(table.column_at(9).is_none());
        assert_eq!(table.column_width_at_index(9), 0.0);
        assert_eq!(table.cell_rect_at_index_path(IndexPath::new(0, 9)).width, 0.0);
    }

    #[test]
    fn test_dequeue_reusable_cell_applies_frame() {
        let mut table = TableBuilder::new(5, 100).reloaded();
        let report = table.resize(Size::new(100.0, 40.0));
        assert_eq!(report.retired_cells.len(), 20 - 4);

        let view = table
            .dequeue_reusable_cell("cell", IndexPath::new(1, 1))
            .unwrap();
        assert_eq!(view.frame, Rect::new(50.0, 20.0, 50.0, 20.0));
        assert_eq!(view.text, None);
        assert_eq!(view.reuse_count, 1);
        assert!(table.dequeue_reusable_cell("other", IndexPath::new(1, 1)).is_none());
    }
}

mod views {
    use super::*;
    use gridview::CellView;

    #[test]
    fn test_retired_view_comes_back_first() {
        let delegate = TableDelegate::<SerialCell>::new()
            .with_column_width(50.0)
            .with_row_height(20.0)
            .with_columns_height(0.0)
            .with_cell_at(|ctx, _| ctx.dequeue_or_create("serial"));
        let mut table = TableView::new(Viewport::new(200.0, 100.0))
            .with_data_source(UniformGrid { columns: 5, rows: 100 })
            .with_delegate(delegate);
        table.reload_data();

        let last_retired = table.cell_at(IndexPath::new(0, 3)).unwrap().serial;
        let report = table.scroll_by(0.0, 20.0);
        assert_eq!(report.retired_cells.len(), 4);

        let reused = table.cell_at(IndexPath::new(5, 0)).unwrap();
        assert_eq!(reused.serial, last_retired);
        assert_eq!(reused.prepared, 1);
        assert_eq!(reused.frame, Rect::new(0.0, 100.0, 50.0, 20.0));
    }

    #[test]
    fn test_custom_identifiers_use_separate_pools() {
        let delegate = TableDelegate::<SerialCell>::new()
            .with_row_height(20.0)
            .with_cell_at(|ctx, path| {
                let id = if path.row % 2 == 0 { "even" } else { "odd" };
                ctx.dequeue_or_create(id)
            });
        let mut table = TableView::new(Viewport::new(100.0, 100.0))
            .with_data_source(UniformGrid { columns: 1, rows: 50 })
            .with_delegate(delegate);
        table.reload_data();
        table.clear();
        let pool = &table.pools().cells;
        assert_eq!(pool.available("even") + pool.available("odd"), pool.len());
        assert!(table.pools().cells.available("even") > 0);
        assert!(table.pools().cells.available("odd") > 0);
        assert_eq!(SerialCell::create("x").reuse_identifier(), "x");
    }

    #[test]
    fn test_default_views_carry_titles_and_text() {
        let table = TableBuilder::new(3, 3)
            .delegate(|d| d.with_columns_height(30.0))
            .reloaded();
        assert_eq!(realized_columns(&table), vec![0, 1, 2]);
        let column = table.column_at(1).unwrap();
        assert_eq!(column.text.as_deref(), Some("C1"));
        assert_eq!(column.frame, Rect::new(50.0, 0.0, 50.0, 30.0));
        let cell = table.cell_at(IndexPath::new(2, 1)).unwrap();
        assert_eq!(cell.text.as_deref(), Some("2:1"));
        assert_eq!(cell.frame, Rect::new(50.0, 70.0, 50.0, 20.0));
    }

    #[test]
    fn test_payloads_reach_default_views() {
        struct Tagged;

        impl TableDataSource for Tagged {
            fn column_count(&self) -> usize {
                2
            }

            fn row_count(&self) -> usize {
                40
            }

            fn data_for_column(&self, index: usize) -> Option<serde_json::Value> {
                Some(serde_json::json!({ "column": index }))
            }

            fn data_for_cell(&self, path: IndexPath) -> Option<serde_json::Value> {
                (path.column == 0).then(|| serde_json::json!([path.row, path.column]))
            }
        }

        let mut table: TableView<TextCell> = TableView::new(Viewport::new(100.0, 100.0))
            .with_delegate(
                TableDelegate::new()
                    .with_column_width(50.0)
                    .with_row_height(20.0)
                    .with_columns_height(20.0),
            )
            .with_data_source(Tagged);
        table.reload_data();
        assert_eq!(
            table.column_at(1).unwrap().data,
            Some(serde_json::json!({ "column": 1 }))
        );
        assert_eq!(
            table.cell_at(IndexPath::new(1, 0)).unwrap().data,
            Some(serde_json::json!([1, 0]))
        );
        assert_eq!(table.cell_at(IndexPath::new(1, 1)).unwrap().data, None);

        // Recycled views take the new index's payload, never the old one
        table.set_content_offset(Point::new(0.0, 400.0));
        let reused = table.cell_at(IndexPath::new(20, 1)).unwrap();
        assert!(reused.reuse_count > 0);
        assert_eq!(reused.data, None);
        assert_eq!(
            table.cell_at(IndexPath::new(20, 0)).unwrap().data,
            Some(serde_json::json!([20, 0]))
        );
    }

    #[test]
    fn test_column_headers_stay_pinned() {
        let mut table = TableBuilder::new(3, 100)
            .delegate(|d| d.with_columns_height(30.0))
            .reloaded();
        let report = table.set_content_offset(Point::new(0.0, 300.0));
        assert_eq!(report.repositioned, 3);
        let column = table.realized().column(0).unwrap();
        assert_eq!(column.band, Band::Header);
        assert_eq!(column.frame.y, 300.0);
    }
}

mod config {
    use super::*;

    #[test]
    fn test_padding_and_margin() {
        let table = TableBuilder::new(5, 3)
            .config(TableConfig {
                table_padding: 10.0,
                item_margin: 5.0,
                ..TableConfig::default()
            })
            .viewport(1000.0, 1000.0)
            .reloaded();
        assert_eq!(table.content_size().width, 290.0);
        assert_eq!(
            table.cell_rect_at_index_path(IndexPath::new(1, 1)),
            Rect::new(65.0, 35.0, 50.0, 20.0)
        );
    }

    #[test]
    fn test_hide_columns_if_empty() {
        let mut table = TableBuilder::new(5, 0)
            .delegate(|d| d.with_columns_height(30.0))
            .reloaded();
        assert_eq!(table.columns_height(), 30.0);
        assert_eq!(table.realized().column_count(), 4);

        table.set_hide_columns_if_empty(true);
        assert_eq!(table.columns_height(), 0.0);
        assert_eq!(table.realized().column_count(), 0);
        assert_eq!(table.content_size().height, 0.0);
    }

    #[test]
    fn test_hide_columns_keeps_header_with_rows() {
        let table = TableBuilder::new(5, 2)
            .delegate(|d| d.with_columns_height(30.0))
            .config(TableConfig {
                hide_columns_if_empty: true,
                ..TableConfig::default()
            })
            .reloaded();
        assert_eq!(table.columns_height(), 30.0);
    }

    #[test]
    fn test_stretch_table_fills_viewport() {
        let table = TableBuilder::new(2, 2)
            .config(TableConfig {
                stretch_table: true,
                ..TableConfig::default()
            })
            .reloaded();
        assert_eq!(table.column_width_at_index(0), 100.0);
        assert_eq!(table.column_width_at_index(1), 100.0);
        assert_eq!(table.content_size().width, 200.0);
    }

    #[test]
    fn test_stretch_never_shrinks() {
        let table = TableBuilder::new(10, 2)
            .config(TableConfig {
                stretch_table: true,
                ..TableConfig::default()
            })
            .reloaded();
        assert_eq!(table.column_width_at_index(0), 50.0);
    }

    #[test]
    fn test_insets_cover_pinned_regions() {
        let table = scenario_table();
        let insets = table.scroll_indicator_insets();
        assert_eq!(insets.top, 20.0);
        assert_eq!(insets.left, 50.0);

        let table = TableBuilder::new(3, 3)
            .delegate(|d| d.with_columns_height(30.0))
            .reloaded();
        let insets = table.scroll_indicator_insets();
        assert_eq!(insets.top, 30.0);
        assert_eq!(insets.left, 0.0);
    }

    #[test]
    fn test_config_json_round_trip_through_view() {
        let json = r#"{"tablePadding": 4, "stretchTable": true}"#;
        let config = TableConfig::from_json(json).unwrap();
        let table = TableBuilder::new(1, 1).config(config).reloaded();
        assert_eq!(table.config().table_padding, 4.0);
        assert!(table.config().stretch_table);
        assert!(!table.config().hide_columns_if_empty);
    }
}

mod fixed_resolution {
    use super::*;

    #[test]
    fn test_predicate_keeps_leading_run_and_pinned_indices() {
        let table = TableBuilder::new(6, 10)
            .delegate(|d| d.with_is_fixed_column(|i| i < 2 || i == 4))
            .reloaded();
        let fixed = table.fixed_region();
        assert_eq!(fixed.fixed_column_count(), 2);
        assert_eq!(fixed.pinned_columns(), &[4]);
        assert!(fixed.is_fixed_column(4));
        assert!(!fixed.is_fixed_column(3));
    }

    #[test]
    fn test_pinned_column_never_scrolls_out() {
        let mut table = TableBuilder::new(12, 10)
            .viewport(300.0, 100.0)
            .delegate(|d| d.with_is_fixed_column(|i| i == 0 || i == 4))
            .reloaded();
        table.set_content_offset(Point::new(300.0, 0.0));

        assert_eq!(table.content_offset(), Point::new(300.0, 0.0));
        assert!(table.visible_columns_range().contains(4));
        let entry = table.realized().cell(IndexPath::new(2, 4)).unwrap();
        assert_eq!(entry.band, Band::FixedColumn);
        // Drawn where it sits unscrolled: screen x 200
        assert_eq!(entry.frame.x, 500.0);
        assert!(table.cell_at(IndexPath::new(2, 3)).is_none());
        assert_eq!(
            table.index_path_for_point(Point::new(210.0, 45.0)),
            Some(IndexPath::new(2, 4))
        );
    }

    #[test]
    fn test_huge_counts_are_clamped() {
        struct Endless;

        impl TableDataSource for Endless {
            fn column_count(&self) -> usize {
                3
            }

            fn row_count(&self) -> usize {
                usize::MAX
            }
        }

        let mut table: TableView<TextCell> = TableView::new(Viewport::new(200.0, 100.0))
            .with_delegate(
                TableDelegate::new()
                    .with_row_height(20.0)
                    .with_columns_height(0.0),
            )
            .with_data_source(Endless);
        table.reload_data();
        assert_eq!(table.row_count(), MAX_AXIS_COUNT);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.visible_rows_range(), VisibleRange::new(0, 5));
    }

    #[test]
    fn test_count_is_clamped() {
        let table = TableBuilder::new(3, 2)
            .delegate(|d| d.with_fixed(10, 10))
            .reloaded();
        assert_eq!(table.fixed_region().fixed_column_count(), 3);
        assert_eq!(table.fixed_region().fixed_row_count(), 2);
    }

    #[test]
    fn test_has_fixed_false_wins() {
        let table = TableBuilder::new(3, 3)
            .delegate(|mut d| {
                d.has_fixed_rows = Some(false);
                d.with_fixed(1, 2)
            })
            .reloaded();
        assert_eq!(table.fixed_region().fixed_row_count(), 0);
        assert_eq!(table.fixed_region().fixed_column_count(), 1);
    }

    #[test]
    fn test_unique_fixed_ranges() {
        let table = TableBuilder::new(10, 10)
            .delegate(|d| d.with_fixed(3, 0))
            .reloaded();
        let window = VisibleRange::new(2, 5);
        assert_eq!(table.fixed_columns_range_for_range(window, false), VisibleRange::new(2, 1));
        assert_eq!(table.fixed_columns_range_for_range(window, true), VisibleRange::new(0, 2));
        assert!(table.fixed_rows_range_for_range(window, false).is_empty());
    }
}

mod requests {
    use super::*;

    #[test]
    fn test_update_request_runs_after_pass() {
        let calls = shared::<Vec<bool>>();
        let log = std::rc::Rc::clone(&calls);
        let mut table = TableBuilder::new(3, 3)
            .delegate(move |d| {
                d.with_update_complete(move |update_all, requests| {
                    log.borrow_mut().push(update_all);
                    if update_all {
                        requests.request_update();
                    }
                })
            })
            .build();
        table.reload_data();
        assert_eq!(*calls.borrow(), vec![true, false]);
    }

    #[test]
    fn test_reload_supersedes_update() {
        let calls = shared::<Vec<bool>>();
        let log = std::rc::Rc::clone(&calls);
        let mut table = TableBuilder::new(3, 3)
            .delegate(move |d| {
                d.with_update_complete(move |update_all, requests| {
                    let first = log.borrow().is_empty();
                    log.borrow_mut().push(update_all);
                    if first {
                        requests.request_update();
                        requests.request_reload();
                        requests.request_update();
                    }
                })
            })
            .build();
        table.reload_data();
        assert_eq!(*calls.borrow(), vec![true, true]);
    }

    #[test]
    fn test_chained_requests_are_bounded() {
        let calls = shared::<usize>();
        let count = std::rc::Rc::clone(&calls);
        let mut table = TableBuilder::new(2, 2)
            .delegate(move |d| {
                d.with_update_complete(move |_, requests| {
                    *count.borrow_mut() += 1;
                    requests.request_update();
                })
            })
            .build();
        table.reload_data();
        assert_eq!(*calls.borrow(), 9);

        // The dropped request does not leak into the next call
        *calls.borrow_mut() = 0;
        table.update_content_size();
        assert_eq!(*calls.borrow(), 9);
    }
}
