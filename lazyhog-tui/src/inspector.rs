//! Detail pane state for the selected record.

use crate::json::{self, FoldState, JsonLine};
use lazyhog_core::EventRecord;
use serde_json::Value;

/// Scroll, fold and related-records state of the inspector.
///
/// The scroll offset is kept within `[0, max_scroll]`, where `max_scroll`
/// follows the current laid-out content and viewport height.
#[derive(Debug, Clone, Default)]
pub struct InspectorState {
    selected_id: Option<String>,
    payload: Option<Value>,
    scroll: usize,
    folds: FoldState,
    related: Option<Vec<EventRecord>>,
    viewport_height: usize,
    loading: bool,
}

impl InspectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn folds(&self) -> &FoldState {
        &self.folds
    }

    pub fn related(&self) -> Option<&[EventRecord]> {
        self.related.as_deref()
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Show `payload` for the record `id`.
    ///
    /// A different identity resets the scroll position, per-path folds and
    /// related records. The same identity only refreshes the payload.
    pub fn set_selection(&mut self, id: &str, payload: Value) {
        if self.selected_id.as_deref() != Some(id) {
            self.selected_id = Some(id.to_string());
            self.scroll = 0;
            self.folds.clear_overrides();
            self.related = None;
            self.loading = false;
        }
        self.payload = Some(payload);
        self.clamp_scroll();
    }

    pub fn set_related(&mut self, related: Vec<EventRecord>) {
        self.related = Some(related);
        self.clamp_scroll();
    }

    pub fn clear(&mut self) {
        self.selected_id = None;
        self.payload = None;
        self.scroll = 0;
        self.folds.clear_overrides();
        self.related = None;
        self.loading = false;
    }

    // ========================================================================
    // Layout
    // ========================================================================

    pub fn lines(&self) -> Vec<JsonLine> {
        match &self.payload {
            Some(payload) => json::layout(payload, &self.folds),
            None => Vec::new(),
        }
    }

    /// Lines taken by the related-records section, heading included.
    pub fn related_section_len(&self) -> usize {
        match &self.related {
            Some(related) => 2 + related.len().max(1),
            None => 0,
        }
    }

    pub fn content_len(&self) -> usize {
        self.lines().len() + self.related_section_len()
    }

    pub fn max_scroll(&self) -> usize {
        self.content_len().saturating_sub(self.viewport_height)
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.clamp_scroll();
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll as isize + delta;
        self.scroll = target.clamp(0, self.max_scroll() as isize) as usize;
    }

    pub fn half_page_down(&mut self) {
        self.scroll_by(self.half_page() as isize);
    }

    pub fn half_page_up(&mut self) {
        self.scroll_by(-(self.half_page() as isize));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    fn half_page(&self) -> usize {
        (self.viewport_height / 2).max(1)
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    // ========================================================================
    // Folding
    // ========================================================================

    pub fn toggle_fold_all(&mut self) {
        self.folds.toggle_all();
        self.clamp_scroll();
    }

    /// Toggle the container whose opening line is nearest at or above the
    /// scroll position. Returns false when there is nothing to fold.
    pub fn toggle_fold_at_scroll(&mut self) -> bool {
        let lines = self.lines();
        if lines.is_empty() {
            return false;
        }
        let start = self.scroll.min(lines.len() - 1);
        let target = lines[..=start]
            .iter()
            .rev()
            .find_map(|line| line.path.clone());
        match target {
            Some(path) => {
                self.folds.toggle(&path);
                self.clamp_scroll();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyhog_test_utils::fixtures;
    use serde_json::json;

    fn tall_payload(keys: usize) -> Value {
        let map: serde_json::Map<String, Value> = (0..keys)
            .map(|i| (format!("k{i:02}"), json!(i)))
            .collect();
        Value::Object(map)
    }

    fn inspector(keys: usize, viewport: usize) -> InspectorState {
        let mut state = InspectorState::new();
        state.set_viewport_height(viewport);
        state.set_selection("evt-1", tall_payload(keys));
        state
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut state = inspector(20, 10);
        // 20 keys plus braces.
        assert_eq!(state.content_len(), 22);
        assert_eq!(state.max_scroll(), 12);
        state.scroll_by(100);
        assert_eq!(state.scroll(), 12);
        state.scroll_by(-100);
        assert_eq!(state.scroll(), 0);
    }

    #[test]
    fn test_short_payload_cannot_scroll() {
        let mut state = inspector(2, 10);
        state.scroll_by(3);
        assert_eq!(state.scroll(), 0);
        state.scroll_to_bottom();
        assert_eq!(state.scroll(), 0);
    }

    #[test]
    fn test_half_page_moves() {
        let mut state = inspector(40, 10);
        state.half_page_down();
        assert_eq!(state.scroll(), 5);
        state.half_page_up();
        assert_eq!(state.scroll(), 0);
    }

    #[test]
    fn test_new_identity_resets_scroll_and_folds() {
        let mut state = inspector(30, 10);
        state.scroll_by(8);
        state.toggle_fold_at_scroll();
        state.set_related(vec![fixtures::event("e", "x", "u1")]);

        state.set_selection("evt-2", tall_payload(30));
        assert_eq!(state.scroll(), 0);
        assert!(state.related().is_none());
        assert!(!state.folds().is_folded("$"));
    }

    #[test]
    fn test_same_identity_keeps_scroll() {
        let mut state = inspector(30, 10);
        state.scroll_by(8);
        state.set_selection("evt-1", tall_payload(31));
        assert_eq!(state.scroll(), 8);
    }

    #[test]
    fn test_same_identity_clamps_when_payload_shrinks() {
        let mut state = inspector(30, 10);
        state.scroll_to_bottom();
        state.set_selection("evt-1", tall_payload(5));
        assert_eq!(state.scroll(), 0);
    }

    #[test]
    fn test_fold_all_shrinks_and_clamps() {
        let mut state = inspector(30, 10);
        state.scroll_to_bottom();
        state.toggle_fold_all();
        assert_eq!(state.content_len(), 1);
        assert_eq!(state.scroll(), 0);
        state.toggle_fold_all();
        assert_eq!(state.content_len(), 32);
    }

    #[test]
    fn test_fold_at_scroll_targets_nearest_container() {
        let mut state = InspectorState::new();
        state.set_viewport_height(3);
        state.set_selection(
            "evt-1",
            json!({"a": 1, "b": {"c": 1, "d": 2, "e": 3}, "f": 4}),
        );
        // Lines: {, a, b {, c, d, e, }, f, }
        state.scroll_by(4);
        assert_eq!(state.scroll(), 4);
        assert!(state.toggle_fold_at_scroll());
        assert!(state.folds().is_folded("$.b"));
        assert!(!state.folds().is_folded("$"));
    }

    #[test]
    fn test_fold_at_scroll_without_payload() {
        let mut state = InspectorState::new();
        assert!(!state.toggle_fold_at_scroll());
    }

    #[test]
    fn test_related_section_extends_content() {
        let mut state = inspector(2, 10);
        let base = state.content_len();
        state.set_related(Vec::new());
        assert_eq!(state.content_len(), base + 3);
        state.set_related(vec![
            fixtures::event("a", "x", "u1"),
            fixtures::event("b", "y", "u1"),
        ]);
        assert_eq!(state.content_len(), base + 4);
    }

    #[test]
    fn test_clear_forgets_selection() {
        let mut state = inspector(5, 10);
        state.clear();
        assert!(state.selected_id().is_none());
        assert!(state.payload().is_none());
        assert_eq!(state.content_len(), 0);
    }
}
