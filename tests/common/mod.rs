//! Common test utilities for table view tests.
//!
//! Provides a uniform grid data source, a builder for `TextCell` tables and
//! a recording cell type for ownership checks.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use gridview::{
    CellView, IndexPath, Rect, TableConfig, TableDataSource, TableDelegate, TableView, TextCell,
    Viewport,
};

/// Grid of `columns x rows` with "r:c" cell text and "C<n>" titles
#[derive(Debug, Clone, Copy)]
pub struct UniformGrid {
    pub columns: usize,
    pub rows: usize,
}

impl TableDataSource for UniformGrid {
    fn column_count(&self) -> usize {
        self.columns
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    fn title_for_column(&self, index: usize) -> Option<String> {
        Some(format!("C{index}"))
    }

    fn text_for_cell(&self, path: IndexPath) -> Option<String> {
        Some(format!("{}:{}", path.row, path.column))
    }
}

/// Builder for tables used across the integration tests
pub struct TableBuilder {
    grid: UniformGrid,
    viewport: Viewport,
    delegate: TableDelegate<TextCell>,
    config: TableConfig,
}

impl TableBuilder {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            grid: UniformGrid { columns, rows },
            viewport: Viewport::new(200.0, 100.0),
            delegate: TableDelegate::new()
                .with_column_width(50.0)
                .with_row_height(20.0)
                .with_columns_height(0.0),
            config: TableConfig::default(),
        }
    }

    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    pub fn delegate(
        mut self,
        f: impl FnOnce(TableDelegate<TextCell>) -> TableDelegate<TextCell>,
    ) -> Self {
        self.delegate = f(self.delegate);
        self
    }

    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Build without reloading
    pub fn build(self) -> TableView<TextCell> {
        TableView::new(self.viewport)
            .with_config(self.config)
            .with_delegate(self.delegate)
            .with_data_source(self.grid)
    }

    /// Build and run the initial reload
    pub fn reloaded(self) -> TableView<TextCell> {
        let mut table = self.build();
        table.reload_data();
        table
    }
}

/// The 5 x 100 grid with one fixed column and one fixed row
pub fn scenario_table() -> TableView<TextCell> {
    TableBuilder::new(5, 100)
        .delegate(|d| d.with_fixed(1, 1))
        .reloaded()
}

/// Realized cell paths, sorted row-major
pub fn realized_paths<V>(table: &TableView<V>) -> Vec<IndexPath>
where
    V: CellView,
{
    table.realized().cells().map(|(path, _)| path).collect()
}

/// Realized column indices, ascending
pub fn realized_columns<V>(table: &TableView<V>) -> Vec<usize>
where
    V: CellView,
{
    table.realized().columns().map(|(index, _)| index).collect()
}

/// Cell view with a serial number, for checking which instance comes back from a pool
#[derive(Debug, Clone, PartialEq)]
pub struct SerialCell {
    pub identifier: String,
    pub serial: usize,
    pub frame: Rect,
    pub prepared: usize,
}

thread_local! {
    static NEXT_SERIAL: RefCell<usize> = const { RefCell::new(0) };
}

impl CellView for SerialCell {
    fn create(identifier: &str) -> Self {
        let serial = NEXT_SERIAL.with(|next| {
            let mut next = next.borrow_mut();
            *next += 1;
            *next
        });
        Self {
            identifier: identifier.to_string(),
            serial,
            frame: Rect::ZERO,
            prepared: 0,
        }
    }

    fn reuse_identifier(&self) -> &str {
        &self.identifier
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    fn prepare_for_reuse(&mut self) {
        self.prepared += 1;
    }
}

/// Shared log handle for delegate callbacks
pub fn shared<T: Default>() -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(T::default()))
}
