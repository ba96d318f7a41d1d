//! Main TableView struct - the update orchestrator.
//!
//! This module provides `TableView`, which:
//! - Resolves the data source and delegate into metrics once per reload
//! - Owns the realized set and the reuse pools
//! - Diffs visible ranges on every scroll/resize and realizes or retires
//!   only the columns and cells that entered or left the viewport
//! - Translates taps back into column indices and index paths

mod cell;
mod events;
mod pool;
mod projection;
mod realized;
mod scroll;

use std::cell::OnceCell;
use std::sync::Arc;

use serde::Serialize;

pub use cell::{CellView, TextCell, DEFAULT_CELL_IDENTIFIER, DEFAULT_COLUMN_IDENTIFIER};
pub use events::TapTarget;
pub use pool::{ReusePool, ReusePools, ViewContext};
pub use projection::{ProjectedCell, ProjectedColumn, Projection};
pub use realized::{RealizedSet, RealizedView};

use crate::layout::{
    FixedRegion, GridLayout, GridMetrics, Viewport, DEFAULT_COLUMNS_HEIGHT, DEFAULT_COLUMN_WIDTH,
    DEFAULT_ROW_HEIGHT, MAX_AXIS_COUNT,
};
use crate::source::{TableDataSource, TableDelegate};
use crate::types::{EdgeInsets, IndexPath, Point, Rect, Size, TableConfig, VisibleRange};

/// Upper bound on passes chained through [`PassRequests`] after one call
const MAX_CHAINED_PASSES: usize = 8;

/// Where the orchestrator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateState {
    /// Nothing realized yet, or cleared
    #[default]
    Idle,
    /// Full rebuild in progress
    Reloading,
    /// Incremental scroll/resize pass in progress
    Updating,
    /// Views are realized and in sync with the viewport
    Realized,
}

/// Kind of pass a callback can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Reload,
    Update,
}

/// Pass requests made from callbacks while a pass is running.
///
/// Requests are coalesced: a reload supersedes an update. They run after the
/// current pass finishes, never inside it.
#[derive(Debug, Default)]
pub struct PassRequests {
    pending: Option<PassKind>,
}

impl PassRequests {
    pub fn request_reload(&mut self) {
        self.pending = Some(PassKind::Reload);
    }

    pub fn request_update(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(PassKind::Update);
        }
    }

    pub fn pending(&self) -> Option<PassKind> {
        self.pending
    }

    fn take(&mut self) -> Option<PassKind> {
        self.pending.take()
    }
}

/// What one reload or update pass changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    /// True for a full reload
    pub update_all: bool,
    pub realized_columns: Vec<usize>,
    pub retired_columns: Vec<usize>,
    pub realized_cells: Vec<IndexPath>,
    pub retired_cells: Vec<IndexPath>,
    /// Surviving views whose frame changed (fixed bands while scrolling)
    pub repositioned: usize,
    /// Views taken from a reuse pool
    pub reused: usize,
    /// Views constructed because the pool had none
    pub created: usize,
}

impl PassReport {
    fn new(update_all: bool) -> Self {
        Self {
            update_all,
            ..Self::default()
        }
    }

    fn record_source(&mut self, reused: bool) {
        if reused {
            self.reused += 1;
        } else {
            self.created += 1;
        }
    }

    /// True when nothing entered, left or moved
    pub fn is_noop(&self) -> bool {
        self.realized_columns.is_empty()
            && self.retired_columns.is_empty()
            && self.realized_cells.is_empty()
            && self.retired_cells.is_empty()
            && self.repositioned == 0
    }
}

/// Sizes resolved from the delegate at reload time
#[derive(Debug, Clone, Default)]
struct TableMetrics {
    column_widths: Vec<f32>,
    row_heights: Vec<f32>,
    columns_height: f32,
}

/// Virtualized table view.
///
/// `V` is the host's view type. The table keeps realized views in its
/// [`RealizedSet`] and recycles retired ones through [`ReusePools`].
pub struct TableView<V> {
    data_source: Option<Box<dyn TableDataSource>>,
    delegate: TableDelegate<V>,
    config: TableConfig,
    viewport: Viewport,
    resolved: TableMetrics,
    fixed: FixedRegion,
    /// Content size cache; reset whenever geometry inputs change
    layout: OnceCell<Arc<GridLayout>>,
    realized: RealizedSet<V>,
    pools: ReusePools<V>,
    state: UpdateState,
    requests: PassRequests,
}

impl<V: CellView> Default for TableView<V> {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl<V: CellView> TableView<V> {
    /// Create an empty table for the given viewport
    pub fn new(viewport: Viewport) -> Self {
        Self {
            data_source: None,
            delegate: TableDelegate::default(),
            config: TableConfig::default(),
            viewport,
            resolved: TableMetrics::default(),
            fixed: FixedRegion::default(),
            layout: OnceCell::new(),
            realized: RealizedSet::default(),
            pools: ReusePools::default(),
            state: UpdateState::Idle,
            requests: PassRequests::default(),
        }
    }

    #[must_use]
    pub fn with_data_source(mut self, data_source: impl TableDataSource + 'static) -> Self {
        self.data_source = Some(Box::new(data_source));
        self
    }

    #[must_use]
    pub fn with_delegate(mut self, delegate: TableDelegate<V>) -> Self {
        self.delegate = delegate;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config.sanitized();
        self
    }

    /// Replace the data source; takes effect on the next reload
    pub fn set_data_source(&mut self, data_source: Option<Box<dyn TableDataSource>>) {
        self.data_source = data_source;
    }

    /// Replace the delegate; takes effect on the next reload
    pub fn set_delegate(&mut self, delegate: TableDelegate<V>) {
        self.delegate = delegate;
    }

    pub fn delegate_mut(&mut self) -> &mut TableDelegate<V> {
        &mut self.delegate
    }

    pub fn state(&self) -> UpdateState {
        self.state
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    /// Apply new configuration, re-laying out realized views
    pub fn set_config(&mut self, config: TableConfig) {
        self.config = config.sanitized();
        self.invalidate_layout();
        self.refresh();
    }

    pub fn set_table_padding(&mut self, padding: f32) {
        self.set_config(TableConfig {
            table_padding: padding,
            ..self.config
        });
    }

    pub fn set_item_margin(&mut self, margin: f32) {
        self.set_config(TableConfig {
            item_margin: margin,
            ..self.config
        });
    }

    pub fn set_hide_columns_if_empty(&mut self, hide: bool) {
        self.set_config(TableConfig {
            hide_columns_if_empty: hide,
            ..self.config
        });
    }

    pub fn set_stretch_table(&mut self, stretch: bool) {
        self.set_config(TableConfig {
            stretch_table: stretch,
            ..self.config
        });
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    fn header_visible(&self) -> bool {
        !(self.config.hide_columns_if_empty && self.resolved.row_heights.is_empty())
    }

    fn build_layout(&self) -> GridLayout {
        let columns_height = if self.header_visible() {
            self.resolved.columns_height
        } else {
            0.0
        };
        let mut layout = GridLayout::new(GridMetrics {
            column_widths: self.resolved.column_widths.clone(),
            row_heights: self.resolved.row_heights.clone(),
            columns_height,
            padding: self.config.table_padding,
            item_margin: self.config.item_margin,
        });
        if self.config.stretch_table {
            layout.stretch_to_width(self.viewport.width);
        }
        layout
    }

    fn layout_arc(&self) -> &Arc<GridLayout> {
        self.layout.get_or_init(|| Arc::new(self.build_layout()))
    }

    /// Current geometry, rebuilt lazily after invalidation
    pub fn layout(&self) -> &GridLayout {
        self.layout_arc()
    }

    fn invalidate_layout(&mut self) {
        self.layout = OnceCell::new();
    }

    pub fn column_count(&self) -> usize {
        self.resolved.column_widths.len()
    }

    pub fn row_count(&self) -> usize {
        self.resolved.row_heights.len()
    }

    pub fn column_width_at_index(&self, index: usize) -> f32 {
        self.layout().column_width(index)
    }

    pub fn row_height_at_index(&self, index: usize) -> f32 {
        self.layout().row_height(index)
    }

    /// Height of the column header band (0 when hidden)
    pub fn columns_height(&self) -> f32 {
        self.layout().columns_height()
    }

    /// Total scrollable size the host surface should use
    pub fn content_size(&self) -> Size {
        self.layout().content_size()
    }

    /// Scroll indicator insets the host surface should use
    pub fn scroll_indicator_insets(&self) -> EdgeInsets {
        Viewport::scroll_indicator_insets(self.layout(), &self.fixed)
    }

    /// Header frame of a column for the current scroll offset, in content coordinates
    pub fn column_rect_at_index(&self, index: usize) -> Rect {
        column_frame(self.layout(), &self.fixed, index, self.viewport.offset())
    }

    /// Frame of a cell for the current scroll offset, in content coordinates
    pub fn cell_rect_at_index_path(&self, path: IndexPath) -> Rect {
        cell_frame(self.layout(), &self.fixed, path, self.viewport.offset())
    }

    // ------------------------------------------------------------------
    // Fixed regions and visibility
    // ------------------------------------------------------------------

    pub fn fixed_region(&self) -> &FixedRegion {
        &self.fixed
    }

    pub fn fixed_columns_range_for_range(&self, range: VisibleRange, unique: bool) -> VisibleRange {
        self.fixed.fixed_columns_range_for_range(range, unique)
    }

    pub fn fixed_rows_range_for_range(&self, range: VisibleRange, unique: bool) -> VisibleRange {
        self.fixed.fixed_rows_range_for_range(range, unique)
    }

    /// Visible columns, fixed columns included
    pub fn visible_columns_range(&self) -> VisibleRange {
        self.viewport.visible_columns(self.layout(), &self.fixed)
    }

    /// Visible rows, fixed rows included
    pub fn visible_rows_range(&self) -> VisibleRange {
        self.viewport.visible_rows(self.layout(), &self.fixed)
    }

    // ------------------------------------------------------------------
    // Realized views and pools
    // ------------------------------------------------------------------

    pub fn realized(&self) -> &RealizedSet<V> {
        &self.realized
    }

    pub fn pools(&self) -> &ReusePools<V> {
        &self.pools
    }

    /// Realized header view of a column; `None` when off screen or out of range
    pub fn column_at(&self, index: usize) -> Option<&V> {
        self.realized.column(index).map(|entry| &entry.view)
    }

    /// Realized view of a cell; `None` when off screen or out of range
    pub fn cell_at(&self, path: IndexPath) -> Option<&V> {
        self.realized.cell(path).map(|entry| &entry.view)
    }

    /// Take a pooled column view, prepared and framed for `index`
    pub fn dequeue_reusable_column(&mut self, identifier: &str, index: usize) -> Option<V> {
        let frame = self.column_rect_at_index(index);
        ViewContext::new(&mut self.pools.columns, frame).dequeue_reusable(identifier)
    }

    /// Take a pooled cell view, prepared and framed for `path`
    pub fn dequeue_reusable_cell(&mut self, identifier: &str, path: IndexPath) -> Option<V> {
        let frame = self.cell_rect_at_index_path(path);
        ViewContext::new(&mut self.pools.cells, frame).dequeue_reusable(identifier)
    }

    // ------------------------------------------------------------------
    // Passes
    // ------------------------------------------------------------------

    /// Rebuild everything from the data source and delegate.
    ///
    /// Drops realized views and pooled views, re-queries counts and metrics,
    /// realizes the visible bands and fires `update_complete(true)`.
    pub fn reload_data(&mut self) -> PassReport {
        let report = self.reload_pass();
        self.drain_requests();
        report
    }

    /// Bring the realized set in line with the current viewport.
    ///
    /// Retires views that left, realizes views that entered and repositions
    /// surviving views of fixed bands, then fires `update_complete(false)`.
    pub fn update_content_size(&mut self) -> PassReport {
        let report = self.update_pass();
        self.drain_requests();
        report
    }

    /// Retire every realized view to the pools and reset to an empty table
    /// without querying the data source.
    pub fn clear(&mut self) -> PassReport {
        let mut report = PassReport::new(true);
        for (index, entry) in std::mem::take(&mut self.realized.columns) {
            self.pools.columns.retire_view(entry.view);
            report.retired_columns.push(index);
        }
        for (path, entry) in std::mem::take(&mut self.realized.cells) {
            self.pools.cells.retire_view(entry.view);
            report.retired_cells.push(path);
        }
        self.resolved = TableMetrics::default();
        self.fixed = FixedRegion::default();
        self.viewport.scroll_x = 0.0;
        self.viewport.scroll_y = 0.0;
        self.invalidate_layout();
        self.state = UpdateState::Idle;
        log::debug!(
            "cleared table: retired {} columns, {} cells",
            report.retired_columns.len(),
            report.retired_cells.len()
        );
        report
    }

    /// Re-run the incremental pass if views are realized
    fn refresh(&mut self) {
        if self.state == UpdateState::Realized {
            self.update_content_size();
        }
    }

    fn reload_pass(&mut self) -> PassReport {
        self.state = UpdateState::Reloading;
        self.realized.clear();
        self.pools.clear();
        self.resolve_metrics();
        self.invalidate_layout();

        let report = self.realize_pass(true);
        self.state = UpdateState::Realized;
        self.notify_complete(true);
        report
    }

    fn update_pass(&mut self) -> PassReport {
        let finished = if self.state == UpdateState::Idle {
            UpdateState::Idle
        } else {
            UpdateState::Realized
        };
        self.state = UpdateState::Updating;
        let report = self.realize_pass(false);
        self.state = finished;
        self.notify_complete(false);
        report
    }

    fn notify_complete(&mut self, update_all: bool) {
        if let Some(handler) = self.delegate.update_complete.as_mut() {
            handler(update_all, &mut self.requests);
        }
    }

    /// Run passes requested by callbacks, one at a time
    fn drain_requests(&mut self) {
        let mut chained = 0;
        while let Some(kind) = self.requests.take() {
            if chained == MAX_CHAINED_PASSES {
                log::warn!("dropping {kind:?} pass: more than {MAX_CHAINED_PASSES} chained passes");
                break;
            }
            chained += 1;
            match kind {
                PassKind::Reload => self.reload_pass(),
                PassKind::Update => self.update_pass(),
            };
        }
    }

    /// Query counts, sizes and fixed configuration once
    fn resolve_metrics(&mut self) {
        let (column_count, row_count) = match &self.data_source {
            Some(source) => (
                clamp_axis_count(source.column_count(), "column"),
                clamp_axis_count(source.row_count(), "row"),
            ),
            None => {
                log::debug!("no data source; table renders empty");
                (0, 0)
            }
        };

        let delegate = &self.delegate;
        let default_width = delegate.column_width.unwrap_or(DEFAULT_COLUMN_WIDTH);
        let column_widths = (0..column_count)
            .map(|i| {
                delegate
                    .column_width_at
                    .as_ref()
                    .map_or(default_width, |width_at| width_at(i))
            })
            .collect();
        let default_height = delegate.row_height.unwrap_or(DEFAULT_ROW_HEIGHT);
        let row_heights = (0..row_count)
            .map(|i| {
                delegate
                    .row_height_at
                    .as_ref()
                    .map_or(default_height, |height_at| height_at(i))
            })
            .collect();

        let fixed_columns = delegate.fixed_column_spec().resolve(column_count, "column");
        let fixed_rows = delegate.fixed_row_spec().resolve(row_count, "row");
        self.fixed = FixedRegion::new(
            fixed_columns.prefix,
            fixed_rows.prefix,
            column_count,
            row_count,
        )
        .with_pinned_columns(fixed_columns.pinned)
        .with_pinned_rows(fixed_rows.pinned)
        .with_pinned_corner(delegate.has_fixed_column_row.unwrap_or(true));

        self.resolved = TableMetrics {
            column_widths,
            row_heights,
            columns_height: delegate.columns_height.unwrap_or(DEFAULT_COLUMNS_HEIGHT),
        };
    }

    /// Diff the realized set against the bands for the current viewport
    fn realize_pass(&mut self, update_all: bool) -> PassReport {
        let layout = Arc::clone(self.layout_arc());
        self.viewport.clamp_scroll(&layout);
        let scroll = self.viewport.offset();
        let fixed = self.fixed.clone();
        let column_bands = self.viewport.column_bands(&layout, &fixed);
        let row_bands = self.viewport.row_bands(&layout, &fixed);
        let show_header = layout.columns_height() > 0.0;

        let mut report = PassReport::new(update_all);

        // Retire first so entering views can reuse what just left.
        let stale_columns: Vec<usize> = self
            .realized
            .columns
            .keys()
            .copied()
            .filter(|&index| !(show_header && column_bands.contains(index)))
            .collect();
        for index in stale_columns {
            if let Some(entry) = self.realized.columns.remove(&index) {
                self.pools.columns.retire_view(entry.view);
                report.retired_columns.push(index);
            }
        }
        let stale_cells: Vec<IndexPath> = self
            .realized
            .cells
            .keys()
            .copied()
            .filter(|path| !(row_bands.contains(path.row) && column_bands.contains(path.column)))
            .collect();
        for path in stale_cells {
            if let Some(entry) = self.realized.cells.remove(&path) {
                self.pools.cells.retire_view(entry.view);
                report.retired_cells.push(path);
            }
        }

        // Survivors keep their view; only frames of anchored bands move.
        for (&index, entry) in &mut self.realized.columns {
            let frame = column_frame(&layout, &fixed, index, scroll);
            entry.band = fixed.header_band(index);
            if entry.frame != frame {
                entry.view.set_frame(frame);
                entry.frame = frame;
                report.repositioned += 1;
            }
        }
        for (&path, entry) in &mut self.realized.cells {
            let frame = cell_frame(&layout, &fixed, path, scroll);
            entry.band = fixed.band_for(path);
            if entry.frame != frame {
                entry.view.set_frame(frame);
                entry.frame = frame;
                report.repositioned += 1;
            }
        }

        if show_header {
            for index in column_bands.iter() {
                if self.realized.columns.contains_key(&index) {
                    continue;
                }
                let frame = column_frame(&layout, &fixed, index, scroll);
                let (view, reused) = self.make_column(index, frame);
                report.record_source(reused);
                self.realized.columns.insert(
                    index,
                    RealizedView {
                        view,
                        frame,
                        band: fixed.header_band(index),
                    },
                );
                report.realized_columns.push(index);
            }
        }

        for row in row_bands.iter() {
            for column in column_bands.iter() {
                let path = IndexPath::new(row, column);
                if self.realized.cells.contains_key(&path) {
                    continue;
                }
                let frame = cell_frame(&layout, &fixed, path, scroll);
                let (view, reused) = self.make_cell(path, frame);
                report.record_source(reused);
                self.realized.cells.insert(
                    path,
                    RealizedView {
                        view,
                        frame,
                        band: fixed.band_for(path),
                    },
                );
                report.realized_cells.push(path);
            }
        }

        log::debug!(
            "{} pass: +{} cells -{} cells, +{} columns -{} columns, {} moved, {} reused",
            if update_all { "reload" } else { "update" },
            report.realized_cells.len(),
            report.retired_cells.len(),
            report.realized_columns.len(),
            report.retired_columns.len(),
            report.repositioned,
            report.reused
        );
        report
    }

    /// Column header view from the delegate, or the default path
    fn make_column(&mut self, index: usize, frame: Rect) -> (V, bool) {
        let Self {
            delegate,
            pools,
            data_source,
            ..
        } = self;
        let mut ctx = ViewContext::new(&mut pools.columns, frame);
        let mut view = match delegate.column_at.as_mut() {
            Some(provider) => provider(&mut ctx, index),
            None => {
                let mut view = ctx.dequeue_or_create(DEFAULT_COLUMN_IDENTIFIER);
                if let Some(source) = data_source.as_ref() {
                    view.set_text(source.title_for_column(index).as_deref());
                    view.set_data(source.data_for_column(index).as_ref());
                } else {
                    view.set_text(None);
                    view.set_data(None);
                }
                view
            }
        };
        view.set_frame(frame);
        (view, ctx.reused())
    }

    /// Cell view from the delegate, or the default path
    fn make_cell(&mut self, path: IndexPath, frame: Rect) -> (V, bool) {
        let Self {
            delegate,
            pools,
            data_source,
            ..
        } = self;
        let mut ctx = ViewContext::new(&mut pools.cells, frame);
        let mut view = match delegate.cell_at.as_mut() {
            Some(provider) => provider(&mut ctx, path),
            None => {
                let mut view = ctx.dequeue_or_create(DEFAULT_CELL_IDENTIFIER);
                if let Some(source) = data_source.as_ref() {
                    view.set_text(source.text_for_cell(path).as_deref());
                    view.set_data(source.data_for_cell(path).as_ref());
                } else {
                    view.set_text(None);
                    view.set_data(None);
                }
                view
            }
        };
        view.set_frame(frame);
        (view, ctx.reused())
    }
}

/// Counts past [`MAX_AXIS_COUNT`] are provider bugs; clamp instead of allocating them
fn clamp_axis_count(count: usize, axis: &str) -> usize {
    if count > MAX_AXIS_COUNT {
        log::warn!("{axis} count {count} exceeds {MAX_AXIS_COUNT}; clamping");
        MAX_AXIS_COUNT
    } else {
        count
    }
}

/// Header frame, pinned vertically and anchored horizontally for fixed columns
fn column_frame(layout: &GridLayout, fixed: &FixedRegion, index: usize, scroll: Point) -> Rect {
    let anchor = fixed.column_anchor(index, scroll);
    layout.column_rect(index, anchor.x).offset_by(0.0, anchor.y)
}

/// Cell frame, anchored on the axes its band pins
fn cell_frame(layout: &GridLayout, fixed: &FixedRegion, path: IndexPath, scroll: Point) -> Rect {
    let anchor = fixed.cell_anchor(path, scroll);
    layout.cell_rect(path, anchor.x, anchor.y)
}
