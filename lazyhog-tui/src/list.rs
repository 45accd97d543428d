//! List pane state: items, cursor, auto-scroll, and the active filter.

use crate::search;
use lazyhog_core::{Record, Resource};
use std::collections::HashSet;

/// A filter applied over the list. `matches` indexes into the items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub query: String,
    pub matches: Vec<usize>,
}

/// Materialized items of the active resource.
///
/// The "effective" list is the filtered view when a filter is active and
/// the full item list otherwise. The cursor always indexes the effective
/// list and stays in bounds whenever it is non-empty.
#[derive(Debug, Clone)]
pub struct ListState {
    resource: Resource,
    items: Vec<Record>,
    cursor: usize,
    auto_scroll: bool,
    new_item_count: usize,
    filter: Option<ActiveFilter>,
    loading: bool,
    error: Option<String>,
}

impl ListState {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            items: Vec::new(),
            cursor: 0,
            auto_scroll: resource.is_live(),
            new_item_count: 0,
            filter: None,
            loading: false,
            error: None,
        }
    }

    /// Switch to another resource, dropping items and filter.
    pub fn reset(&mut self, resource: Resource) {
        *self = Self::new(resource);
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn new_item_count(&self) -> usize {
        self.new_item_count
    }

    pub fn filter(&self) -> Option<&ActiveFilter> {
        self.filter.as_ref()
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn effective_len(&self) -> usize {
        match &self.filter {
            Some(filter) => filter.matches.len(),
            None => self.items.len(),
        }
    }

    pub fn effective_item(&self, index: usize) -> Option<&Record> {
        match &self.filter {
            Some(filter) => filter
                .matches
                .get(index)
                .and_then(|item| self.items.get(*item)),
            None => self.items.get(index),
        }
    }

    pub fn effective_items(&self) -> Vec<&Record> {
        (0..self.effective_len())
            .filter_map(|index| self.effective_item(index))
            .collect()
    }

    pub fn selected(&self) -> Option<&Record> {
        self.effective_item(self.cursor)
    }

    // ========================================================================
    // Data replacement
    // ========================================================================

    /// Install a fresh snapshot of the active resource.
    ///
    /// While the live feed is detached, items whose identity was absent from
    /// the previous snapshot add to `new_item_count`.
    pub fn replace_items(&mut self, items: Vec<Record>) {
        if self.resource.is_live() && !self.auto_scroll && !self.items.is_empty() {
            let known: HashSet<String> = self.items.iter().map(Record::id).collect();
            let fresh = items
                .iter()
                .filter(|item| !known.contains(&item.id()))
                .count();
            self.new_item_count += fresh;
        }

        self.items = items;
        self.loading = false;
        self.error = None;

        if let Some(filter) = &mut self.filter {
            filter.matches = search::matching_indices(&self.items, &filter.query);
        }

        if self.auto_scroll && self.filter.is_none() {
            self.cursor = self.items.len().saturating_sub(1);
            self.new_item_count = 0;
        } else {
            self.clamp_cursor();
        }
    }

    /// Show exactly one item of `resource`, as after a pivot.
    pub fn replace_with_single(&mut self, resource: Resource, item: Record) {
        self.reset(resource);
        self.auto_scroll = false;
        self.items = vec![item];
    }

    /// Swap an item in place by identity. Returns false when absent.
    pub fn update_item(&mut self, item: Record) -> bool {
        let id = item.id();
        match self.items.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Cursor movement
    // ========================================================================

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.effective_len();
        if len == 0 {
            return;
        }
        let last = (len - 1) as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
        self.sync_auto_scroll();
    }

    pub fn jump_to_top(&mut self) {
        self.cursor = 0;
        self.sync_auto_scroll();
    }

    /// Drop any filter, pin to the newest item and follow the feed.
    pub fn jump_to_live(&mut self) {
        self.filter = None;
        self.cursor = self.items.len().saturating_sub(1);
        self.auto_scroll = self.resource.is_live();
        self.new_item_count = 0;
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Narrow the list to items matching `query`. An empty query clears.
    pub fn apply_filter(&mut self, query: &str) {
        if query.is_empty() {
            self.clear_filter();
            return;
        }
        self.filter = Some(ActiveFilter {
            query: query.to_string(),
            matches: search::matching_indices(&self.items, query),
        });
        self.cursor = 0;
        self.auto_scroll = false;
    }

    /// Restore the full list, keeping the selected item under the cursor.
    pub fn clear_filter(&mut self) {
        let Some(filter) = self.filter.take() else {
            return;
        };
        if let Some(index) = filter.matches.get(self.cursor) {
            self.cursor = *index;
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.effective_len().saturating_sub(1));
    }

    fn sync_auto_scroll(&mut self) {
        if !self.resource.is_live() || self.filter.is_some() {
            return;
        }
        self.auto_scroll = self.cursor + 1 == self.items.len();
        if self.auto_scroll {
            self.new_item_count = 0;
        }
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(Resource::Events)
    }
}
