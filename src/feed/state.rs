//! The list state consumed by the rendering layer, plus its observers.

use std::collections::HashMap;

use super::cursor::PageCursor;
use super::models::{ReviewId, ReviewItem};

/// Single source of truth for the review list.
///
/// Items accumulate append-only across pages; the only in-place mutation is
/// lifting an item's line cap. Mutators are crate-private so that every
/// change flows through the loader's single-writer path.
#[derive(Debug, Clone)]
pub struct ListState {
    items: Vec<ReviewItem>,
    is_loading: bool,
    cursor: PageCursor,
    index_by_id: HashMap<ReviewId, usize>,
}

impl ListState {
    /// Creates an empty state with the given cursor.
    #[must_use]
    pub fn new(cursor: PageCursor) -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            cursor,
            index_by_id: HashMap::new(),
        }
    }

    /// Returns the accumulated items in source order.
    #[must_use]
    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    /// Looks up an item by its stable identity.
    #[must_use]
    pub fn item(&self, id: ReviewId) -> Option<&ReviewItem> {
        self.index_by_id
            .get(&id)
            .and_then(|&index| self.items.get(index))
    }

    /// Returns the number of accumulated items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true before the first page has been merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true while the initial page load is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns the pagination cursor.
    #[must_use]
    pub const fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub(crate) const fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub(crate) const fn cursor_mut(&mut self) -> &mut PageCursor {
        &mut self.cursor
    }

    /// Appends a merged page, registering each item's identity.
    pub(crate) fn append(&mut self, items: Vec<ReviewItem>) {
        for item in items {
            self.index_by_id.insert(item.id, self.items.len());
            self.items.push(item);
        }
    }

    /// Lifts the line cap of the identified item.
    ///
    /// Returns true when the item was found and not yet expanded; unknown
    /// ids and repeated calls are no-ops.
    pub(crate) fn expand_text(&mut self, id: ReviewId) -> bool {
        let Some(&index) = self.index_by_id.get(&id) else {
            return false;
        };
        match self.items.get_mut(index) {
            Some(item) if !item.is_expanded() => {
                item.max_lines = 0;
                true
            }
            _ => false,
        }
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(PageCursor::default())
    }
}

/// Observer receiving the full state snapshot on every change.
pub trait StateObserver: Send + Sync {
    /// Called after loading starts, a page merges, a load fails, or an
    /// item's text expands.
    fn state_changed(&self, state: &ListState);
}

/// Observer that ignores all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStateObserver;

impl StateObserver for NoopStateObserver {
    fn state_changed(&self, _state: &ListState) {}
}
