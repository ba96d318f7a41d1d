//! WASM host binding.
//!
//! `GridView` wraps a [`TableView`] of [`TextCell`]s driven by a plain JS
//! object:
//!
//! ```javascript
//! const source = {
//!   columnCount: () => 5,
//!   rowCount: () => 1000,
//!   titleForColumn: (index) => `C${index}`,     // optional
//!   textForCell: (row, column) => `${row}:${column}`, // optional
//!   dataForCell: (row, column) => ({ row, column }), // optional, JSON-like
//! };
//! ```
//!
//! Every mutating call returns the pass report; `projection()` returns the
//! realized views with their frames so the host can sync its DOM or canvas.

use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::layout::Viewport;
use crate::source::{TableDataSource, TableDelegate};
use crate::types::{IndexPath, Point, Size, TableConfig};
use crate::view::{TableView, TextCell};

/// Data source backed by functions looked up on a JS object
struct JsDataSource {
    column_count: Function,
    row_count: Function,
    title_for_column: Option<Function>,
    text_for_cell: Option<Function>,
    data_for_cell: Option<Function>,
}

fn lookup(object: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(object, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

fn required(object: &JsValue, name: &str) -> Result<Function, JsValue> {
    lookup(object, name)
        .ok_or_else(|| JsValue::from_str(&format!("data source is missing `{name}()`")))
}

/// Non-negative integral count from a JS number; anything else counts as 0
fn to_count(value: &JsValue) -> usize {
    match value.as_f64() {
        Some(n) if n.is_finite() && n > 0.0 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let count = n.floor() as usize;
            count
        }
        _ => 0,
    }
}

impl JsDataSource {
    fn new(object: &JsValue) -> Result<Self, JsValue> {
        Ok(Self {
            column_count: required(object, "columnCount")?,
            row_count: required(object, "rowCount")?,
            title_for_column: lookup(object, "titleForColumn"),
            text_for_cell: lookup(object, "textForCell"),
            data_for_cell: lookup(object, "dataForCell"),
        })
    }

    fn count(function: &Function, what: &str) -> usize {
        match function.call0(&JsValue::NULL) {
            Ok(value) => to_count(&value),
            Err(e) => {
                log::warn!("{what}() threw {e:?}; using 0");
                0
            }
        }
    }
}

impl TableDataSource for JsDataSource {
    fn column_count(&self) -> usize {
        Self::count(&self.column_count, "columnCount")
    }

    fn row_count(&self) -> usize {
        Self::count(&self.row_count, "rowCount")
    }

    fn title_for_column(&self, index: usize) -> Option<String> {
        let function = self.title_for_column.as_ref()?;
        function
            .call1(&JsValue::NULL, &JsValue::from(index))
            .ok()?
            .as_string()
    }

    fn text_for_cell(&self, path: IndexPath) -> Option<String> {
        let function = self.text_for_cell.as_ref()?;
        function
            .call2(
                &JsValue::NULL,
                &JsValue::from(path.row),
                &JsValue::from(path.column),
            )
            .ok()?
            .as_string()
    }

    fn data_for_cell(&self, path: IndexPath) -> Option<serde_json::Value> {
        let function = self.data_for_cell.as_ref()?;
        let value = function
            .call2(
                &JsValue::NULL,
                &JsValue::from(path.row),
                &JsValue::from(path.column),
            )
            .ok()?;
        if value.is_null() || value.is_undefined() {
            return None;
        }
        match serde_wasm_bindgen::from_value(value) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("dataForCell({path}) returned a non-JSON value: {e}");
                None
            }
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Sizing and fixed settings applied to the delegate on every reload
#[derive(Default)]
struct DelegateSettings {
    fixed_columns: Option<usize>,
    fixed_rows: Option<usize>,
    pin_corner: Option<bool>,
    column_width: Option<f32>,
    row_height: Option<f32>,
    columns_height: Option<f32>,
    tap_callback: Option<Function>,
}

impl DelegateSettings {
    fn delegate(&self) -> TableDelegate<TextCell> {
        let mut delegate = TableDelegate::new();
        delegate.fixed_column_count = self.fixed_columns;
        delegate.fixed_row_count = self.fixed_rows;
        delegate.has_fixed_column_row = self.pin_corner;
        delegate.column_width = self.column_width;
        delegate.row_height = self.row_height;
        delegate.columns_height = self.columns_height;
        if let Some(callback) = self.tap_callback.clone() {
            let cell_callback = callback.clone();
            delegate = delegate
                .with_tap_column(move |index, _| {
                    let _ = callback.call2(&JsValue::NULL, &JsValue::from(index), &JsValue::NULL);
                })
                .with_tap_cell(move |path, _| {
                    let _ = cell_callback.call2(
                        &JsValue::NULL,
                        &JsValue::from(path.row),
                        &JsValue::from(path.column),
                    );
                });
        }
        delegate
    }
}

/// Virtualized table for JS hosts
#[wasm_bindgen]
pub struct GridView {
    table: TableView<TextCell>,
    settings: DelegateSettings,
}

#[wasm_bindgen]
impl GridView {
    /// Create a view of the given size over a JS data source object
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, source: JsValue) -> Result<GridView, JsValue> {
        console_error_panic_hook::set_once();
        let source = JsDataSource::new(&source)?;
        Ok(GridView {
            table: TableView::new(Viewport::new(width, height)).with_data_source(source),
            settings: DelegateSettings::default(),
        })
    }

    /// Fix the leading `columns` columns and `rows` rows; applied on the next reload
    #[wasm_bindgen(js_name = "setFixed")]
    pub fn set_fixed(&mut self, columns: usize, rows: usize, pin_corner: bool) {
        self.settings.fixed_columns = Some(columns);
        self.settings.fixed_rows = Some(rows);
        self.settings.pin_corner = Some(pin_corner);
    }

    /// Uniform sizes; applied on the next reload
    #[wasm_bindgen(js_name = "setSizes")]
    pub fn set_sizes(&mut self, column_width: f32, row_height: f32, columns_height: f32) {
        self.settings.column_width = Some(column_width);
        self.settings.row_height = Some(row_height);
        self.settings.columns_height = Some(columns_height);
    }

    /// `callback(column, null)` for header taps, `callback(row, column)` for cells
    #[wasm_bindgen(js_name = "setTapCallback")]
    pub fn set_tap_callback(&mut self, callback: Option<Function>) {
        self.settings.tap_callback = callback;
    }

    /// Apply a `TableConfig`-shaped object (`tablePadding`, `itemMargin`, ...)
    #[wasm_bindgen(js_name = "setConfig")]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: TableConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;
        self.table.set_config(config);
        Ok(())
    }

    /// Re-query the data source and rebuild every view
    #[wasm_bindgen]
    pub fn reload(&mut self) -> Result<JsValue, JsValue> {
        self.table.set_delegate(self.settings.delegate());
        to_js(&self.table.reload_data())
    }

    #[wasm_bindgen(js_name = "scrollTo")]
    pub fn scroll_to(&mut self, x: f32, y: f32) -> Result<JsValue, JsValue> {
        to_js(&self.table.set_content_offset(Point::new(x, y)))
    }

    #[wasm_bindgen(js_name = "scrollBy")]
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32) -> Result<JsValue, JsValue> {
        to_js(&self.table.scroll_by(delta_x, delta_y))
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) -> Result<JsValue, JsValue> {
        to_js(&self.table.resize(Size::new(width, height)))
    }

    /// Hit-test a viewport point and fire the tap callback
    #[wasm_bindgen]
    pub fn tap(&mut self, x: f32, y: f32) -> Result<JsValue, JsValue> {
        to_js(&self.table.tap_at(Point::new(x, y)))
    }

    /// Realized views, frames and published geometry
    #[wasm_bindgen]
    pub fn projection(&self) -> Result<JsValue, JsValue> {
        to_js(&self.table.projection())
    }

    #[wasm_bindgen(js_name = "contentWidth")]
    pub fn content_width(&self) -> f32 {
        self.table.content_size().width
    }

    #[wasm_bindgen(js_name = "contentHeight")]
    pub fn content_height(&self) -> f32 {
        self.table.content_size().height
    }
}
