//! Left pane: the resource selector.

use crate::catalog;
use crate::nav::Focus;
use crate::poll::PollStatus;
use crate::state::App;
use crate::theme::border_color;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect, now: Instant) {
    let focused = app.focus == Focus::Selector;
    let active = app.list.resource();

    let mut lines: Vec<Line> = catalog::entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let marker = if index == app.selector_cursor { "▶" } else { " " };
            let style = if entry.resource == active {
                Style::default()
                    .fg(app.theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(app.theme.primary)),
                Span::styled(
                    format!("[{}] ", entry.hotkey),
                    Style::default().fg(app.theme.text_dim),
                ),
                Span::styled(format!("{} {}", entry.icon, entry.label), style),
            ])
        })
        .collect();

    if active.is_live() {
        let status = app.poll_status(now);
        let color = match status {
            PollStatus::Live => app.theme.success,
            PollStatus::Paused => app.theme.warning,
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(status.label(), Style::default().fg(color))));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title("Resources")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color(focused, &app.theme))),
    );
    f.render_widget(paragraph, area);
}
