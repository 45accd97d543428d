//! Right pane: JSON payload of the selected item and pivot results.

use crate::nav::Focus;
use crate::state::App;
use crate::theme::border_color;
use crate::widgets::JsonHighlighter;
use lazyhog_core::EventRecord;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let focused = app.focus == Focus::Inspector;
    let block = Block::default()
        .title(inspector_title(app))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(focused, &app.theme)));

    if app.inspector.payload().is_none() {
        let message = if app.inspector.is_loading() {
            "Loading..."
        } else {
            "Select an item to view details"
        };
        let paragraph = Paragraph::new(Span::styled(
            message,
            Style::default().fg(app.theme.text_dim),
        ))
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let mut lines = JsonHighlighter::new(&app.theme).highlight(&app.inspector.lines());
    if let Some(related) = app.inspector.related() {
        lines.extend(related_lines(app, related));
    }

    let scroll = u16::try_from(app.inspector.scroll()).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

pub fn inspector_title(app: &App) -> String {
    let mut title = if app.inspector.payload().is_some() {
        "Details".to_string()
    } else {
        "Inspector".to_string()
    };
    if app.inspector.is_loading() && app.inspector.payload().is_some() {
        title.push_str(" (loading)");
    }
    if let Some(feedback) = &app.clipboard_feedback {
        title.push_str(" - ");
        title.push_str(&feedback.message);
    }
    title
}

/// Heading, blank separator and one line per event. Matches
/// `InspectorState::related_section_len`.
fn related_lines(app: &App, related: &[EventRecord]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Recent events ({})", related.len()),
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    if related.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No recent events",
            Style::default().fg(app.theme.text_dim),
        )));
        return lines;
    }
    for event in related {
        let time = event
            .timestamp
            .map(|ts| ts.format("%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!("  {time} "), Style::default().fg(app.theme.text_dim)),
            Span::styled(event.event.clone(), Style::default().fg(app.theme.text)),
        ]));
    }
    lines
}
