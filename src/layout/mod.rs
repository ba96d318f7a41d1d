//! Layout engine for computing cell positions and visible ranges.
//!
//! This module handles:
//! - Pre-computing column/row positions from widths and heights
//! - Resolving fixed (frozen) columns and rows
//! - Managing viewport state (scroll position, visible ranges)
//! - Binary search for efficient index lookup at content coordinates

mod fixed;
mod grid_layout;
mod viewport;

pub use fixed::{AxisBands, AxisFixedSpec, Band, FixedRegion, ResolvedAxis};
pub use grid_layout::{
    AxisLayout, GridLayout, GridMetrics, DEFAULT_COLUMNS_HEIGHT, DEFAULT_COLUMN_WIDTH,
    DEFAULT_ROW_HEIGHT, MAX_AXIS_COUNT,
};
pub use viewport::Viewport;
