//! The view contract realized columns and cells must satisfy.

use serde::Serialize;

use crate::types::Rect;

/// Identifier of the default column header view
pub const DEFAULT_COLUMN_IDENTIFIER: &str = "column";

/// Identifier of the default cell view
pub const DEFAULT_CELL_IDENTIFIER: &str = "cell";

/// A host view the table can position, fill with text and recycle.
///
/// The table owns realized views by value; the host's display tree is a
/// projection of [`crate::TableView`]'s realized set.
pub trait CellView {
    /// Construct a fresh view when the reuse pool has none available
    fn create(identifier: &str) -> Self;

    /// Pool the view returns to when it leaves the viewport
    fn reuse_identifier(&self) -> &str;

    fn set_frame(&mut self, frame: Rect);

    /// Apply the data source's title or cell text
    fn set_text(&mut self, _text: Option<&str>) {}

    /// Apply the data source's payload for the column or cell
    fn set_data(&mut self, _data: Option<&serde_json::Value>) {}

    /// Reset per-index state before the view is handed out again
    fn prepare_for_reuse(&mut self) {}
}

/// Minimal text view used by the CLI, the wasm binding and tests
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCell {
    pub identifier: String,
    pub frame: Rect,
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// How many times this view has come back out of a reuse pool
    pub reuse_count: u32,
}

impl CellView for TextCell {
    fn create(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            frame: Rect::ZERO,
            text: None,
            data: None,
            reuse_count: 0,
        }
    }

    fn reuse_identifier(&self) -> &str {
        &self.identifier
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    fn set_text(&mut self, text: Option<&str>) {
        self.text = text.map(str::to_string);
    }

    fn set_data(&mut self, data: Option<&serde_json::Value>) {
        self.data = data.cloned();
    }

    fn prepare_for_reuse(&mut self) {
        self.text = None;
        self.data = None;
        self.reuse_count = self.reuse_count.saturating_add(1);
    }
}
