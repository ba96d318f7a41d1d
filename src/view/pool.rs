//! Identifier-keyed free lists of retired views.
//!
//! Views move into a pool by value when they leave the viewport and move
//! back out when a view with the same identifier is needed again.

use std::collections::HashMap;

use super::CellView;
use crate::types::Rect;

/// Free list of unused views keyed by reuse identifier.
///
/// Pools are unbounded and hand views back in LIFO order, so retiring a view
/// and immediately dequeuing its identifier returns that same view.
pub struct ReusePool<V> {
    entries: HashMap<String, Vec<V>>,
}

impl<V> Default for ReusePool<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ReusePool<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Pop the most recently retired view for `identifier`, if any
    pub fn dequeue(&mut self, identifier: &str) -> Option<V> {
        self.entries.get_mut(identifier)?.pop()
    }

    /// Push a view back into the pool for `identifier`
    pub fn retire(&mut self, identifier: &str, view: V) {
        if let Some(stack) = self.entries.get_mut(identifier) {
            stack.push(view);
        } else {
            self.entries.insert(identifier.to_string(), vec![view]);
        }
    }

    /// Number of pooled views for one identifier
    pub fn available(&self, identifier: &str) -> usize {
        self.entries.get(identifier).map_or(0, Vec::len)
    }

    /// Total pooled views across identifiers
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Identifiers that currently have pooled views
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(id, _)| id.as_str())
    }

    /// Drop every pooled view
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<V: CellView> ReusePool<V> {
    /// Retire a view under its own reuse identifier
    pub fn retire_view(&mut self, view: V) {
        let identifier = view.reuse_identifier().to_string();
        self.retire(&identifier, view);
    }
}

/// The table's two pools: column header views and cell views
pub struct ReusePools<V> {
    pub columns: ReusePool<V>,
    pub cells: ReusePool<V>,
}

impl<V> Default for ReusePools<V> {
    fn default() -> Self {
        Self {
            columns: ReusePool::new(),
            cells: ReusePool::new(),
        }
    }
}

impl<V> ReusePools<V> {
    pub fn clear(&mut self) {
        self.columns.clear();
        self.cells.clear();
    }
}

/// Handed to view providers while the table realizes a column or cell.
///
/// Carries the pool for the kind of view being built and the frame the view
/// will occupy.
pub struct ViewContext<'a, V> {
    pool: &'a mut ReusePool<V>,
    frame: Rect,
    reused: bool,
}

impl<'a, V: CellView> ViewContext<'a, V> {
    pub(crate) fn new(pool: &'a mut ReusePool<V>, frame: Rect) -> Self {
        Self {
            pool,
            frame,
            reused: false,
        }
    }

    /// Frame the realized view will be placed at
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Take a pooled view, prepared for reuse and moved to this context's frame.
    ///
    /// Returns `None` when the pool has nothing for `identifier`; the caller
    /// then builds a fresh view.
    pub fn dequeue_reusable(&mut self, identifier: &str) -> Option<V> {
        let mut view = self.pool.dequeue(identifier)?;
        view.prepare_for_reuse();
        view.set_frame(self.frame);
        self.reused = true;
        Some(view)
    }

    /// Pooled view for `identifier`, or a freshly created one
    pub fn dequeue_or_create(&mut self, identifier: &str) -> V {
        self.dequeue_reusable(identifier).unwrap_or_else(|| {
            let mut view = V::create(identifier);
            view.set_frame(self.frame);
            view
        })
    }

    pub(crate) fn reused(&self) -> bool {
        self.reused
    }
}
