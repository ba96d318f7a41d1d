//! Collaborator contracts: the data source and the delegate.
//!
//! The data source is a trait because the counts are required. The delegate
//! is a struct of optional handles; each absent handle has a documented
//! default, and the table resolves them once per reload.

use crate::layout::AxisFixedSpec;
use crate::types::IndexPath;
use crate::view::{PassRequests, ViewContext};

/// Supplies the table's dimensions and content
pub trait TableDataSource {
    fn column_count(&self) -> usize;

    fn row_count(&self) -> usize;

    /// Title shown by the default column header view
    fn title_for_column(&self, _index: usize) -> Option<String> {
        None
    }

    /// Text shown by the default cell view
    fn text_for_cell(&self, _path: IndexPath) -> Option<String> {
        None
    }

    /// Arbitrary payload attached to a column
    fn data_for_column(&self, _index: usize) -> Option<serde_json::Value> {
        None
    }

    /// Arbitrary payload attached to a cell
    fn data_for_cell(&self, _path: IndexPath) -> Option<serde_json::Value> {
        None
    }
}

/// Builds the header view of a column
pub type ColumnProvider<V> = Box<dyn FnMut(&mut ViewContext<'_, V>, usize) -> V>;
/// Builds the view of a cell
pub type CellProvider<V> = Box<dyn FnMut(&mut ViewContext<'_, V>, IndexPath) -> V>;
/// Per-index yes/no question
pub type IndexPredicate = Box<dyn Fn(usize) -> bool>;
/// Per-index size
pub type IndexMetric = Box<dyn Fn(usize) -> f32>;
/// Column header tap callback
pub type ColumnTapHandler = Box<dyn FnMut(usize, &mut PassRequests)>;
/// Cell tap callback
pub type CellTapHandler = Box<dyn FnMut(IndexPath, &mut PassRequests)>;
/// Called after every pass; the flag is true after a full reload
pub type UpdateHandler = Box<dyn FnMut(bool, &mut PassRequests)>;

/// Optional overrides for views, metrics, fixed regions and events.
///
/// | handle | default when absent |
/// |---|---|
/// | `column_at` / `cell_at` | dequeue or create a default view, fill with data source text |
/// | `has_fixed_column_row` | `true` (corner pinned on both axes) |
/// | `has_fixed_columns` / `has_fixed_rows` | derived from the other fixed settings |
/// | `fixed_column_count` / `fixed_row_count` | no fixed prefix |
/// | `is_fixed_column` / `is_fixed_row` | not consulted |
/// | `column_width` / `column_width_at` | [`crate::layout::DEFAULT_COLUMN_WIDTH`] |
/// | `row_height` / `row_height_at` | [`crate::layout::DEFAULT_ROW_HEIGHT`] |
/// | `columns_height` | [`crate::layout::DEFAULT_COLUMNS_HEIGHT`] |
/// | `tap_column` / `tap_cell` / `update_complete` | no-op |
pub struct TableDelegate<V> {
    pub column_at: Option<ColumnProvider<V>>,
    pub cell_at: Option<CellProvider<V>>,

    pub has_fixed_column_row: Option<bool>,
    pub has_fixed_columns: Option<bool>,
    pub has_fixed_rows: Option<bool>,
    pub fixed_column_count: Option<usize>,
    pub fixed_row_count: Option<usize>,
    pub is_fixed_column: Option<IndexPredicate>,
    pub is_fixed_row: Option<IndexPredicate>,

    /// Width used for every column without a per-index override
    pub column_width: Option<f32>,
    pub column_width_at: Option<IndexMetric>,
    pub columns_height: Option<f32>,
    /// Height used for every row without a per-index override
    pub row_height: Option<f32>,
    pub row_height_at: Option<IndexMetric>,

    pub tap_column: Option<ColumnTapHandler>,
    pub tap_cell: Option<CellTapHandler>,
    pub update_complete: Option<UpdateHandler>,
}

impl<V> Default for TableDelegate<V> {
    fn default() -> Self {
        Self {
            column_at: None,
            cell_at: None,
            has_fixed_column_row: None,
            has_fixed_columns: None,
            has_fixed_rows: None,
            fixed_column_count: None,
            fixed_row_count: None,
            is_fixed_column: None,
            is_fixed_row: None,
            column_width: None,
            column_width_at: None,
            columns_height: None,
            row_height: None,
            row_height_at: None,
            tap_column: None,
            tap_cell: None,
            update_complete: None,
        }
    }
}

impl<V> TableDelegate<V> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_column_at(
        mut self,
        provider: impl FnMut(&mut ViewContext<'_, V>, usize) -> V + 'static,
    ) -> Self {
        self.column_at = Some(Box::new(provider));
        self
    }

    #[must_use]
    pub fn with_cell_at(
        mut self,
        provider: impl FnMut(&mut ViewContext<'_, V>, IndexPath) -> V + 'static,
    ) -> Self {
        self.cell_at = Some(Box::new(provider));
        self
    }

    /// Fix the first `columns` columns and `rows` rows
    #[must_use]
    pub fn with_fixed(mut self, columns: usize, rows: usize) -> Self {
        self.fixed_column_count = Some(columns);
        self.fixed_row_count = Some(rows);
        self
    }

    #[must_use]
    pub fn with_fixed_column_row(mut self, pinned: bool) -> Self {
        self.has_fixed_column_row = Some(pinned);
        self
    }

    #[must_use]
    pub fn with_is_fixed_column(mut self, predicate: impl Fn(usize) -> bool + 'static) -> Self {
        self.is_fixed_column = Some(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn with_is_fixed_row(mut self, predicate: impl Fn(usize) -> bool + 'static) -> Self {
        self.is_fixed_row = Some(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn with_column_width(mut self, width: f32) -> Self {
        self.column_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_column_width_at(mut self, metric: impl Fn(usize) -> f32 + 'static) -> Self {
        self.column_width_at = Some(Box::new(metric));
        self
    }

    #[must_use]
    pub fn with_columns_height(mut self, height: f32) -> Self {
        self.columns_height = Some(height);
        self
    }

    #[must_use]
    pub fn with_row_height(mut self, height: f32) -> Self {
        self.row_height = Some(height);
        self
    }

    #[must_use]
    pub fn with_row_height_at(mut self, metric: impl Fn(usize) -> f32 + 'static) -> Self {
        self.row_height_at = Some(Box::new(metric));
        self
    }

    #[must_use]
    pub fn with_tap_column(
        mut self,
        handler: impl FnMut(usize, &mut PassRequests) + 'static,
    ) -> Self {
        self.tap_column = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn with_tap_cell(
        mut self,
        handler: impl FnMut(IndexPath, &mut PassRequests) + 'static,
    ) -> Self {
        self.tap_cell = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn with_update_complete(
        mut self,
        handler: impl FnMut(bool, &mut PassRequests) + 'static,
    ) -> Self {
        self.update_complete = Some(Box::new(handler));
        self
    }

    pub(crate) fn fixed_column_spec(&self) -> AxisFixedSpec<'_> {
        AxisFixedSpec {
            has_fixed: self.has_fixed_columns,
            count: self.fixed_column_count,
            predicate: self.is_fixed_column.as_deref(),
        }
    }

    pub(crate) fn fixed_row_spec(&self) -> AxisFixedSpec<'_> {
        AxisFixedSpec {
            has_fixed: self.has_fixed_rows,
            count: self.fixed_row_count,
            predicate: self.is_fixed_row.as_deref(),
        }
    }
}
