//! View rendering dispatch.

pub mod confirm;
pub mod help;
pub mod inspector;
pub mod list;
pub mod selector;

pub use list::RenderLine;

use crate::catalog;
use crate::layout::{frame_rows, is_narrow, pane_columns};
use crate::nav::Focus;
use crate::state::{App, Modal};
use crate::theme::notification_color;
use crate::widgets::SearchBar;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

pub fn render_view(f: &mut Frame<'_>, app: &App, now: Instant) {
    let [header, body, footer] = frame_rows(f.size());

    render_header(f, app, header);

    if is_narrow(f.size().width) {
        render_narrow(f, app, body, now);
    } else {
        let [selector_area, list_area, inspector_area] = pane_columns(body);
        selector::render(f, app, selector_area, now);
        list::render(f, app, list_area);
        inspector::render(f, app, inspector_area);
    }

    render_footer(f, app, footer);

    match &app.modal {
        Some(Modal::Help) => help::render(f, app, centered_rect(f.size(), 60, 90)),
        Some(Modal::Search(input)) => {
            let bar = SearchBar {
                title: "Search",
                query: input.text(),
                prompt_style: Style::default().fg(app.theme.primary),
                text_style: Style::default().fg(app.theme.text),
                border_style: Style::default().fg(app.theme.border_focus),
            };
            bar.render(f, search_rect(body));
        }
        Some(Modal::ConfirmFlagToggle(confirm)) => {
            confirm::render(f, app, confirm, centered_rect(f.size(), 50, 40));
        }
        None => {}
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let env_style = if app.environment.is_production() {
        Style::default()
            .fg(app.theme.error)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.info)
    };
    let title = Line::from(vec![
        Span::styled(
            "🦔 lazyhog",
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" | {} | ", app.config.instance_url),
            Style::default().fg(app.theme.text_dim),
        ),
        Span::styled(app.environment.label().to_uppercase(), env_style),
    ]);
    let block = Block::default().borders(Borders::ALL).title(title);
    f.render_widget(block, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = if let Some(note) = app.notifications.latest() {
        let mut text = format!("{}: {}", note.level.label(), note.message);
        if let Some(action) = note.action {
            text.push_str(&format!(" ({})", action.hint()));
        }
        (text, Style::default().fg(notification_color(note.level, &app.theme)))
    } else {
        (
            pane_help(app.focus).to_string(),
            Style::default().fg(app.theme.text_dim),
        )
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::TOP))
        .style(style);
    f.render_widget(footer, area);
}

/// One-line key reminder for the focused pane.
pub fn pane_help(focus: Focus) -> &'static str {
    match focus {
        Focus::Selector => "j/k move • 1-3 jump • Enter open • Tab next pane • ? help • q quit",
        Focus::List => {
            "j/k move • g/G top/live • Enter details • / search • p pivot • t toggle flag • ? help"
        }
        Focus::Inspector => {
            "j/k scroll • Space fold • Z fold all • y copy JSON • c copy ID • p pivot • ? help"
        }
    }
}

/// Narrow terminals show the focused pane under a breadcrumb.
fn render_narrow(f: &mut Frame<'_>, app: &App, body: Rect, now: Instant) {
    if body.height == 0 {
        return;
    }
    let crumb = Rect { height: 1, ..body };
    let pane = Rect {
        y: body.y + 1,
        height: body.height - 1,
        ..body
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            breadcrumb(app),
            Style::default().fg(app.theme.text_dim),
        )),
        crumb,
    );
    match app.focus {
        Focus::Selector => selector::render(f, app, pane, now),
        Focus::List => list::render(f, app, pane),
        Focus::Inspector => inspector::render(f, app, pane),
    }
}

pub fn breadcrumb(app: &App) -> String {
    let resource = catalog::entry(app.list.resource()).label;
    let mut parts = vec![resource];
    if app.focus.index() >= Focus::List.index() {
        parts.push("List");
    }
    if app.focus == Focus::Inspector {
        parts.push("Details");
    }
    parts.join(" > ")
}

/// A rectangle of `percent_x` by `percent_y` centred in `area`.
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Three rows at the bottom of the body for the search input.
fn search_rect(body: Rect) -> Rect {
    let height = body.height.min(3);
    Rect {
        y: body.y + body.height - height,
        height,
        ..body
    }
}
