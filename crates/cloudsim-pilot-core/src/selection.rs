//! Selection over lists owned by a snapshot
//!
//! The data lives in a [`ResourceSnapshot`](crate::snapshot::ResourceSnapshot)
//! and is replaced wholesale on every poll, so the cursor keeps an index
//! plus the identity of the selected item and re-finds it after each
//! replacement.

/// Cursor into a list that may be replaced at any time
///
/// # Examples
///
/// ```
/// use cloudsim_pilot_core::selection::ListCursor;
///
/// let mut cursor = ListCursor::new();
/// let items = vec!["a", "b", "c"];
/// cursor.select_next(items.len());
/// cursor.sync(&items, |s| *s);
/// assert_eq!(cursor.selected(&items), Some(&"b"));
///
/// // "b" moved to the front after a refresh; the cursor follows it
/// let items = vec!["b", "c"];
/// cursor.sync(&items, |s| *s);
/// assert_eq!(cursor.index(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListCursor {
    index: usize,
    /// Identity of the item at `index` when last synced
    anchor: Option<String>,
}

impl ListCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently selected index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the currently selected item
    pub fn selected<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.index)
    }

    /// Move selection to the next item (wraps to start)
    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index + 1) % len;
        }
        self.anchor = None;
    }

    /// Move selection to the previous item (wraps to end)
    pub fn select_prev(&mut self, len: usize) {
        if len > 0 {
            self.index = if self.index == 0 || self.index >= len {
                len - 1
            } else {
                self.index - 1
            };
        }
        self.anchor = None;
    }

    /// Jump to the first item
    pub fn select_first(&mut self) {
        self.index = 0;
        self.anchor = None;
    }

    /// Jump to the last item
    pub fn select_last(&mut self, len: usize) {
        self.index = len.saturating_sub(1);
        self.anchor = None;
    }

    /// Re-anchor after navigation or a data replacement
    ///
    /// If the previously selected item is still present the cursor moves
    /// to it; otherwise the index is clamped to the new bounds.
    pub fn sync<T, F>(&mut self, items: &[T], key: F)
    where
        F: Fn(&T) -> &str,
    {
        if let Some(anchor) = &self.anchor {
            if let Some(pos) = items.iter().position(|item| key(item) == anchor.as_str()) {
                self.index = pos;
            }
        }
        if self.index >= items.len() {
            self.index = items.len().saturating_sub(1);
        }
        self.anchor = items.get(self.index).map(|item| key(item).to_string());
    }
}
