/// The three panes, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Focus {
    #[default]
    Selector,
    List,
    Inspector,
}

impl Focus {
    pub fn title(self) -> &'static str {
        match self {
            Focus::Selector => "Resources",
            Focus::List => "List",
            Focus::Inspector => "Details",
        }
    }

    pub fn all() -> &'static [Focus] {
        &[Focus::Selector, Focus::List, Focus::Inspector]
    }

    pub fn index(self) -> usize {
        match self {
            Focus::Selector => 0,
            Focus::List => 1,
            Focus::Inspector => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Focus> {
        Focus::all().get(index).copied()
    }

    /// One pane right, stopping at the inspector.
    pub fn right(self) -> Focus {
        Focus::from_index(self.index() + 1).unwrap_or(Focus::Inspector)
    }

    /// One pane left, stopping at the selector.
    pub fn left(self) -> Focus {
        Focus::from_index(self.index().saturating_sub(1)).unwrap_or(Focus::Selector)
    }
}
