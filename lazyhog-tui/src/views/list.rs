//! Middle pane: items of the active resource.

use crate::catalog::{self, Column};
use crate::nav::Focus;
use crate::state::App;
use crate::theme::{border_color, flag_color, HedgehogTheme};
use chrono::{NaiveDate, Utc};
use lazyhog_core::{EventRecord, FeatureFlag, PersonRecord, Record, Timestamp};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState as ScrollState, Paragraph, Wrap},
    Frame,
};

const CURSOR_MARK: &str = "▶ ";
const CURSOR_PAD: &str = "  ";

/// Styled one-line projection of a record.
pub trait RenderLine {
    fn render_line(&self, width: u16, theme: &HedgehogTheme) -> Line<'static>;
}

impl RenderLine for Record {
    fn render_line(&self, width: u16, theme: &HedgehogTheme) -> Line<'static> {
        let columns = catalog::entry(self.resource()).columns;
        let line = match self {
            Record::Event(event) => event_line(event, Utc::now().date_naive(), columns, theme),
            Record::Person(person) => person_line(person, columns, theme),
            Record::Flag(flag) => flag_line(flag, columns, theme),
        };
        clip_line(line, width as usize)
    }
}

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let entry = catalog::entry(app.list.resource());
    let focused = app.focus == Focus::List;
    let block = Block::default()
        .title(list_title(app))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(focused, &app.theme)));

    if let Some(error) = app.list.error() {
        let lines = vec![
            Line::from(Span::styled(
                format!("Error: {error}"),
                Style::default().fg(app.theme.error),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press 'r' to retry",
                Style::default().fg(app.theme.text_dim),
            )),
        ];
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    if app.list.is_loading() {
        let paragraph = Paragraph::new(Span::styled(
            format!("Loading {}...", entry.label.to_lowercase()),
            Style::default().fg(app.theme.text_dim),
        ))
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    if app.list.effective_len() == 0 {
        let lines = if app.list.is_filtered() {
            vec![Line::from(Span::styled(
                "No matches found",
                Style::default().fg(app.theme.text_dim),
            ))]
        } else {
            vec![
                Line::from(Span::styled(
                    entry.empty_title,
                    Style::default().fg(app.theme.text),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    entry.empty_hint,
                    Style::default().fg(app.theme.text_dim),
                )),
            ]
        };
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);
    let [header_area, rows_area] = split_header(inner);
    let inner_width = inner.width.saturating_sub(CURSOR_MARK.chars().count() as u16);
    f.render_widget(
        Paragraph::new(clip_line(header_line(entry.columns, &app.theme), inner.width as usize)),
        header_area,
    );

    let cursor = app.list.cursor();
    let items: Vec<ListItem> = app
        .list
        .effective_items()
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let marker = if index == cursor { CURSOR_MARK } else { CURSOR_PAD };
            let mut line = record.render_line(inner_width, &app.theme);
            line.spans
                .insert(0, Span::styled(marker, Style::default().fg(app.theme.primary)));
            ListItem::new(line)
        })
        .collect();

    let mut state = ScrollState::default();
    state.select(Some(cursor));
    let list = List::new(items).highlight_style(
        Style::default()
            .bg(app.theme.bg_highlight)
            .add_modifier(Modifier::BOLD),
    );
    f.render_stateful_widget(list, rows_area, &mut state);
}

fn split_header(inner: Rect) -> [Rect; 2] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);
    [rows[0], rows[1]]
}

/// Column titles, aligned with the rows below them.
pub fn header_line(columns: &[Column], theme: &HedgehogTheme) -> Line<'static> {
    let style = Style::default()
        .fg(theme.text_dim)
        .add_modifier(Modifier::UNDERLINED);
    let mut spans = vec![Span::raw(CURSOR_PAD)];
    spans.extend(
        columns
            .iter()
            .enumerate()
            .map(|(index, column)| Span::styled(cell(column.title, columns, index), style)),
    );
    Line::from(spans)
}

/// Pane title with the live-feed state and the active filter.
pub fn list_title(app: &App) -> String {
    let entry = catalog::entry(app.list.resource());
    let mut title = format!("{} {}", entry.icon, entry.label);
    if entry.is_live() {
        if app.list.auto_scroll() {
            title.push_str(" [LIVE]");
        } else if app.list.new_item_count() > 0 {
            title.push_str(&format!(" [PAUSED: {} new]", app.list.new_item_count()));
        } else {
            title.push_str(" [PAUSED]");
        }
    }
    if let Some(filter) = app.list.filter() {
        title.push_str(&format!(
            " /{} ({}/{})",
            filter.query,
            filter.matches.len(),
            app.list.items().len()
        ));
    }
    title
}

// ============================================================================
// Record lines
// ============================================================================

fn event_line(
    event: &EventRecord,
    today: NaiveDate,
    columns: &[Column],
    theme: &HedgehogTheme,
) -> Line<'static> {
    let time = event
        .timestamp
        .map(|ts| time_label(ts, today))
        .unwrap_or_else(|| "--:--:--".to_string());
    Line::from(vec![
        Span::styled(cell(&time, columns, 0), Style::default().fg(theme.text_dim)),
        Span::styled(cell(&event.event, columns, 1), Style::default().fg(theme.text)),
        Span::styled(
            cell(&event.distinct_id, columns, 2),
            Style::default().fg(theme.secondary),
        ),
    ])
}

fn person_line(person: &PersonRecord, columns: &[Column], theme: &HedgehogTheme) -> Line<'static> {
    let (name, style) = if person.name.is_empty() {
        ("(no name)", Style::default().fg(theme.text_muted))
    } else {
        (person.name.as_str(), Style::default().fg(theme.text))
    };
    let distinct_id = person.primary_distinct_id().unwrap_or_default();
    Line::from(vec![
        Span::styled(cell(name, columns, 0), style),
        Span::styled(cell(distinct_id, columns, 1), Style::default().fg(theme.secondary)),
    ])
}

fn flag_line(flag: &FeatureFlag, columns: &[Column], theme: &HedgehogTheme) -> Line<'static> {
    let dot = if flag.active { "●" } else { "○" };
    Line::from(vec![
        Span::styled(cell(dot, columns, 0), Style::default().fg(flag_color(flag.active, theme))),
        Span::styled(cell(&flag.key, columns, 1), Style::default().fg(theme.text)),
    ])
}

/// `text` fitted to column `index`: truncated, padded, then a separating
/// space. The last column is not padded.
fn cell(text: &str, columns: &[Column], index: usize) -> String {
    let width = columns.get(index).map_or(0, |c| c.width as usize);
    let text = truncate(text, width);
    if index + 1 >= columns.len() {
        text
    } else {
        format!("{text:<width$} ")
    }
}

/// `HH:MM:SS` for today, `MM-DD HH:MM` otherwise.
pub fn time_label(ts: Timestamp, today: NaiveDate) -> String {
    if ts.date_naive() == today {
        ts.format("%H:%M:%S").to_string()
    } else {
        ts.format("%m-%d %H:%M").to_string()
    }
}

/// Cut `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push('…');
    cut
}

fn clip_line(line: Line<'static>, width: usize) -> Line<'static> {
    let mut remaining = width;
    let mut spans = Vec::with_capacity(line.spans.len());
    for span in line.spans {
        if remaining == 0 {
            break;
        }
        let len = span.content.chars().count();
        if len <= remaining {
            remaining -= len;
            spans.push(span);
        } else {
            let text = truncate(&span.content, remaining);
            spans.push(Span::styled(text, span.style));
            remaining = 0;
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lazyhog_test_utils::fixtures;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("much too long", 8), "much to…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_time_label_today_and_earlier() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 5, 7).single().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(time_label(ts, today), "09:05:07");
        assert_eq!(time_label(ts, tomorrow), "05-01 09:05");
    }

    #[test]
    fn test_event_line_columns() {
        let theme = HedgehogTheme::hedgehog();
        let columns = catalog::entry(lazyhog_core::Resource::Events).columns;
        let event = fixtures::event("e", "a_really_long_event_name_that_overflows", "user-1");
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let text = plain(&event_line(&event, today, columns, &theme));
        assert!(text.starts_with("12:00:00"));
        assert!(text.contains("a_really_long_event_name…"));
        assert!(text.ends_with("user-1"));
    }

    #[test]
    fn test_person_without_name() {
        let theme = HedgehogTheme::hedgehog();
        let columns = catalog::entry(lazyhog_core::Resource::Persons).columns;
        let text = plain(&person_line(&fixtures::person("anon-7", ""), columns, &theme));
        assert!(text.starts_with("(no name)"));
        assert!(text.ends_with("anon-7"));
    }

    #[test]
    fn test_flag_dot_reflects_state() {
        let theme = HedgehogTheme::hedgehog();
        let on = Record::Flag(fixtures::flag(1, "on_flag", true)).render_line(80, &theme);
        let off = Record::Flag(fixtures::flag(2, "off_flag", false)).render_line(80, &theme);
        assert_eq!(plain(&on), "● on_flag");
        assert_eq!(plain(&off), "○ off_flag");
        assert_eq!(on.spans[0].style.fg, Some(theme.success));
    }

    #[test]
    fn test_header_aligns_with_rows() {
        let theme = HedgehogTheme::hedgehog();
        let columns = catalog::entry(lazyhog_core::Resource::Events).columns;
        let header = plain(&header_line(columns, &theme));
        assert!(header.starts_with("  Time"));
        let row = Record::Event(fixtures::event("e", "$pageview", "user-1"))
            .render_line(80, &theme);
        let row = format!("{CURSOR_PAD}{}", plain(&row));
        assert_eq!(header.find("Event"), row.find("$pageview"));
        assert_eq!(header.find("Distinct ID"), row.find("user-1"));
    }

    #[test]
    fn test_render_line_respects_width() {
        let theme = HedgehogTheme::hedgehog();
        let line = Record::Event(fixtures::event("e", "$pageview", "user-1"))
            .render_line(15, &theme);
        assert_eq!(plain(&line).chars().count(), 15);
    }
}
