//! Value types shared by the layout engine and the table view.

mod config;
mod geometry;
mod index_path;
mod range;

pub use config::TableConfig;
pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use index_path::IndexPath;
pub use range::VisibleRange;
