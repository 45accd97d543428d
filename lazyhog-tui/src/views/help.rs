//! Keybinding overlay.

use crate::state::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("q / Ctrl-c", "Quit"),
            ("?", "Toggle help"),
            ("Tab / l / →", "Focus next pane"),
            ("S-Tab / h / ←", "Focus previous pane"),
            ("Esc", "Back"),
            ("x", "Dismiss notification"),
        ],
    ),
    (
        "Resource Selector",
        &[
            ("j / k", "Move (switches after a short pause)"),
            ("1 2 3", "Jump to Events, Persons, Flags"),
            ("Enter", "Open list"),
            ("r", "Refresh"),
        ],
    ),
    (
        "List View",
        &[
            ("j / k", "Move"),
            ("g / G", "Top / newest (resumes live)"),
            ("Enter", "Load full details"),
            ("/", "Search"),
            ("p", "Pivot to person"),
            ("t", "Toggle feature flag"),
            ("r", "Refresh"),
        ],
    ),
    (
        "Inspector",
        &[
            ("j / k", "Scroll"),
            ("Ctrl-d / Ctrl-u", "Half page down / up"),
            ("g / G", "Top / bottom"),
            ("Space", "Fold container at top line"),
            ("Z", "Fold / unfold all"),
            ("y", "Copy JSON"),
            ("c", "Copy ID"),
            ("p", "Pivot to person"),
        ],
    ),
    (
        "Search Mode",
        &[
            ("Enter", "Apply filter"),
            ("Esc", "Cancel"),
            ("Ctrl-u", "Clear input"),
        ],
    ),
];

pub fn help_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (title, bindings) in SECTIONS {
        lines.push(Line::from(Span::styled(
            *title,
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )));
        for (keys, description) in *bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("  {keys:<18}"), Style::default().fg(app.theme.secondary)),
                Span::styled(*description, Style::default().fg(app.theme.text)),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press ? or Esc to close this help",
        Style::default().fg(app.theme.text_dim),
    )));
    lines
}

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let paragraph = Paragraph::new(help_lines(app)).block(
        Block::default()
            .title("Keybindings")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
