//! Serializable snapshot of what the table currently shows.
//!
//! Hosts that keep their own display tree (the wasm binding, the CLI) render
//! from this projection instead of walking the realized set themselves.

use serde::Serialize;

use super::{CellView, TableView};
use crate::layout::Band;
use crate::types::{EdgeInsets, IndexPath, Point, Rect, Size, VisibleRange};

/// A realized column header view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedColumn<'a, V> {
    pub index: usize,
    pub frame: Rect,
    pub band: Band,
    pub z_index: u8,
    pub view: &'a V,
}

/// A realized cell view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedCell<'a, V> {
    pub path: IndexPath,
    pub frame: Rect,
    pub band: Band,
    pub z_index: u8,
    pub view: &'a V,
}

/// Everything a host surface needs to draw one frame
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection<'a, V> {
    pub content_size: Size,
    pub content_offset: Point,
    pub viewport_size: Size,
    pub scroll_indicator_insets: EdgeInsets,
    pub visible_columns: VisibleRange,
    pub visible_rows: VisibleRange,
    /// Ordered by column index
    pub columns: Vec<ProjectedColumn<'a, V>>,
    /// Ordered by index path, row-major
    pub cells: Vec<ProjectedCell<'a, V>>,
}

impl<V: CellView> TableView<V> {
    /// Snapshot of the realized set and the published geometry
    pub fn projection(&self) -> Projection<'_, V> {
        let columns = self
            .realized
            .columns()
            .map(|(index, entry)| ProjectedColumn {
                index,
                frame: entry.frame,
                band: entry.band,
                z_index: entry.band.z_index(),
                view: &entry.view,
            })
            .collect();
        let cells = self
            .realized
            .cells()
            .map(|(path, entry)| ProjectedCell {
                path,
                frame: entry.frame,
                band: entry.band,
                z_index: entry.band.z_index(),
                view: &entry.view,
            })
            .collect();

        Projection {
            content_size: self.content_size(),
            content_offset: self.content_offset(),
            viewport_size: self.viewport.size(),
            scroll_indicator_insets: self.scroll_indicator_insets(),
            visible_columns: self.visible_columns_range(),
            visible_rows: self.visible_rows_range(),
            columns,
            cells,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use crate::layout::Viewport;
    use crate::source::{TableDataSource, TableDelegate};
    use crate::view::{TableView, TextCell};

    struct Names;

    impl TableDataSource for Names {
        fn column_count(&self) -> usize {
            2
        }

        fn row_count(&self) -> usize {
            2
        }

        fn title_for_column(&self, index: usize) -> Option<String> {
            Some(format!("C{index}"))
        }

        fn text_for_cell(&self, path: crate::types::IndexPath) -> Option<String> {
            Some(format!("{}:{}", path.row, path.column))
        }
    }

    #[test]
    fn test_projection_serializes_realized_views() {
        let mut table: TableView<TextCell> = TableView::new(Viewport::new(500.0, 500.0))
            .with_data_source(Names)
            .with_delegate(TableDelegate::new().with_fixed(1, 0));
        table.reload_data();

        let json = serde_json::to_value(table.projection()).unwrap();
        assert_eq!(json["columns"].as_array().unwrap().len(), 2);
        assert_eq!(json["columns"][0]["band"], "fixedHeader");
        assert_eq!(json["columns"][1]["view"]["text"], "C1");
        assert_eq!(json["cells"].as_array().unwrap().len(), 4);
        assert_eq!(json["cells"][1]["view"]["text"], "0:1");
        assert_eq!(json["cells"][0]["band"], "fixedColumn");
        assert_eq!(json["contentSize"]["width"], 200.0);
    }
}
