//! Free-text filtering of list items and the search entry buffer.

use lazyhog_core::Record;

/// Positions of the items whose searchable text contains `query`,
/// ignoring case. An empty query matches everything.
pub fn matching_indices(items: &[Record], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..items.len()).collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.searchable_text().to_lowercase().contains(&needle))
        .map(|(index, _)| index)
        .collect()
}

/// Filtered projection of `items`, in their original order.
pub fn apply_filter(items: &[Record], query: &str) -> Vec<Record> {
    matching_indices(items, query)
        .into_iter()
        .map(|index| items[index].clone())
        .collect()
}

/// Text buffer behind the search modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    buffer: String,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            buffer: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn push(&mut self, ch: char) {
        if !ch.is_control() {
            self.buffer.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// The query to apply, with surrounding whitespace removed.
    pub fn query(&self) -> &str {
        self.buffer.trim()
    }
}
