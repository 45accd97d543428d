//! Screen geometry shared by the views and the inspector's viewport.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Terminals narrower than this show one pane at a time.
pub const NARROW_WIDTH: u16 = 100;

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 2;
const PANE_BORDER: u16 = 2;

pub fn is_narrow(width: u16) -> bool {
    width < NARROW_WIDTH
}

/// Header, body and footer rows.
pub fn frame_rows(area: Rect) -> [Rect; 3] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);
    [rows[0], rows[1], rows[2]]
}

/// The three pane columns of a wide body.
///
/// The selector takes 15% (at least 20 cells), the list 40% of the rest
/// (at least 30), the inspector whatever remains.
pub fn pane_columns(body: Rect) -> [Rect; 3] {
    let selector = (body.width * 15 / 100).max(20).min(body.width);
    let rest = body.width - selector;
    let list = (rest * 40 / 100).max(30).min(rest);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(selector),
            Constraint::Length(list),
            Constraint::Min(0),
        ])
        .split(body);
    [columns[0], columns[1], columns[2]]
}

/// Content rows visible in the inspector for a terminal of `height` rows.
pub fn inspector_viewport_height(height: u16) -> usize {
    height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT + PANE_BORDER) as usize
}
