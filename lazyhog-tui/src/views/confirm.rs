//! Flag toggle confirmation dialog.

use crate::state::{App, FlagToggleConfirm};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn state_span(active: bool, app: &App) -> Span<'static> {
    if active {
        Span::styled("✓ Active", Style::default().fg(app.theme.success))
    } else {
        Span::styled("✗ Inactive", Style::default().fg(app.theme.text_dim))
    }
}

pub fn confirm_lines(app: &App, confirm: &FlagToggleConfirm) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if confirm.production {
        lines.push(Line::from(Span::styled(
            "⚠ PRODUCTION: this affects live users",
            Style::default()
                .fg(app.theme.error)
                .add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "DEV environment",
            Style::default().fg(app.theme.info),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw(format!("{} flag ", capitalize(confirm.verb()))),
        Span::styled(
            format!("'{}'", confirm.key),
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("?"),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("Current: "),
        state_span(confirm.current, app),
        Span::raw("  →  New: "),
        state_span(!confirm.current, app),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[y] confirm   [n] cancel",
        Style::default().fg(app.theme.text_dim),
    )));
    lines
}

pub fn render(f: &mut Frame<'_>, app: &App, confirm: &FlagToggleConfirm, area: Rect) {
    let border = if confirm.production {
        app.theme.error
    } else {
        app.theme.border_focus
    };
    let paragraph = Paragraph::new(confirm_lines(app, confirm))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Toggle Feature Flag")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
