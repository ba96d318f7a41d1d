//! Declarative grid descriptions.
//!
//! A `GridDescription` is a JSON document carrying everything needed to
//! build a [`TableView`] without writing a data source by hand. The CLI and
//! the benches use it.
//!
//! ```json
//! {
//!   "viewport": { "width": 200, "height": 100 },
//!   "columnCount": 5,
//!   "rowCount": 100,
//!   "columnWidth": 50,
//!   "rowHeight": 20,
//!   "columnsHeight": 0,
//!   "fixedColumns": 1,
//!   "fixedRows": 1,
//!   "titles": ["Id", "Name"],
//!   "cells": [["1", "Ada"]],
//!   "data": [[{ "id": 1 }, null]],
//!   "config": { "tablePadding": 4 },
//!   "scroll": { "x": 0, "y": 200 }
//! }
//! ```

use serde::Deserialize;

use crate::error::{GridviewError, Result};
use crate::layout::Viewport;
use crate::source::{TableDataSource, TableDelegate};
use crate::types::{IndexPath, Point, Size, TableConfig};
use crate::view::{CellView, TableView};

/// A grid declared as data
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridDescription {
    pub viewport: Option<Size>,
    pub column_count: usize,
    pub row_count: usize,
    pub column_width: Option<f32>,
    /// Per-column widths; overrides `column_width` where present
    pub column_widths: Option<Vec<f32>>,
    pub row_height: Option<f32>,
    /// Per-row heights; overrides `row_height` where present
    pub row_heights: Option<Vec<f32>>,
    pub columns_height: Option<f32>,
    pub fixed_columns: Option<usize>,
    pub fixed_rows: Option<usize>,
    pub pin_corner: Option<bool>,
    pub titles: Vec<String>,
    /// Row-major cell text; missing entries render empty
    pub cells: Vec<Vec<String>>,
    /// Row-major cell payloads handed to views next to their text
    pub data: Vec<Vec<serde_json::Value>>,
    pub config: TableConfig,
    /// Offset to scroll to after the initial reload
    pub scroll: Option<Point>,
}

impl GridDescription {
    /// Parse and validate a description.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or per-index size lists whose
    /// length disagrees with the declared counts.
    pub fn from_json(json: &str) -> Result<Self> {
        let description: GridDescription = serde_json::from_str(json)?;
        description.validate()?;
        Ok(description)
    }

    fn validate(&self) -> Result<()> {
        if let Some(widths) = &self.column_widths {
            if widths.len() != self.column_count {
                return Err(GridviewError::Config(format!(
                    "columnWidths has {} entries for {} columns",
                    widths.len(),
                    self.column_count
                )));
            }
        }
        if let Some(heights) = &self.row_heights {
            if heights.len() != self.row_count {
                return Err(GridviewError::Config(format!(
                    "rowHeights has {} entries for {} rows",
                    heights.len(),
                    self.row_count
                )));
            }
        }
        Ok(())
    }

    fn delegate<V>(&self) -> TableDelegate<V> {
        let mut delegate = TableDelegate::new();
        delegate.fixed_column_count = self.fixed_columns;
        delegate.fixed_row_count = self.fixed_rows;
        delegate.has_fixed_column_row = self.pin_corner;
        delegate.column_width = self.column_width;
        delegate.row_height = self.row_height;
        delegate.columns_height = self.columns_height;
        if let Some(widths) = self.column_widths.clone() {
            delegate.column_width_at =
                Some(Box::new(move |i: usize| widths.get(i).copied().unwrap_or(0.0)));
        }
        if let Some(heights) = self.row_heights.clone() {
            delegate.row_height_at =
                Some(Box::new(move |i: usize| heights.get(i).copied().unwrap_or(0.0)));
        }
        delegate
    }

    /// Build the table, reload it and apply the initial scroll
    pub fn into_table<V: CellView>(self) -> TableView<V> {
        let viewport = self
            .viewport
            .map_or_else(Viewport::default, |size| Viewport::new(size.width, size.height));
        let delegate = self.delegate();
        let config = self.config;
        let scroll = self.scroll;

        let mut table = TableView::new(viewport)
            .with_config(config)
            .with_delegate(delegate)
            .with_data_source(self);
        table.reload_data();
        if let Some(offset) = scroll {
            table.set_content_offset(offset);
        }
        table
    }
}

impl TableDataSource for GridDescription {
    fn column_count(&self) -> usize {
        self.column_count
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn title_for_column(&self, index: usize) -> Option<String> {
        self.titles.get(index).cloned()
    }

    fn text_for_cell(&self, path: IndexPath) -> Option<String> {
        self.cells.get(path.row)?.get(path.column).cloned()
    }

    fn data_for_cell(&self, path: IndexPath) -> Option<serde_json::Value> {
        self.data
            .get(path.row)?
            .get(path.column)
            .filter(|value| !value.is_null())
            .cloned()
    }
}
