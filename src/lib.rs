//! gridview - virtualized table view engine
//!
//! Lays out a two-dimensional grid of cells under a column header band and
//! keeps only the visible part of it realized:
//! - Prefix-sum geometry with binary-search visibility queries
//! - Fixed (frozen) leading columns and rows, with an optional pinned corner
//! - Identifier-keyed reuse pools for column and cell views
//! - Incremental passes that realize or retire only what crossed the viewport
//!
//! # Usage
//!
//! ```
//! use gridview::{IndexPath, Point, TableDataSource, TableDelegate, TableView, TextCell, Viewport};
//!
//! struct Numbers;
//!
//! impl TableDataSource for Numbers {
//!     fn column_count(&self) -> usize { 5 }
//!     fn row_count(&self) -> usize { 1_000 }
//! }
//!
//! let mut table: TableView<TextCell> = TableView::new(Viewport::new(200.0, 100.0))
//!     .with_data_source(Numbers)
//!     .with_delegate(TableDelegate::new().with_fixed(1, 1));
//! table.reload_data();
//! table.set_content_offset(Point::new(0.0, 400.0));
//! assert!(table.cell_at(IndexPath::new(0, 0)).is_some());
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'gridview';
//! await init();
//! const view = new GridView(width, height, { columnCount: () => 5, rowCount: () => 1000 });
//! view.reload();
//! const frame = view.scrollTo(0, 400);
//! ```

pub mod description;
pub mod error;
pub mod layout;
pub mod source;
pub mod types;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use description::GridDescription;
pub use error::{GridviewError, Result};
pub use layout::{Band, FixedRegion, GridLayout, Viewport};
pub use source::{TableDataSource, TableDelegate};
pub use types::*;
pub use view::{
    CellView, PassKind, PassReport, PassRequests, Projection, TableView, TapTarget, TextCell,
    UpdateState, ViewContext,
};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
