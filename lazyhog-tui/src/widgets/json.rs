//! Syntax highlighting for laid-out JSON lines.

use crate::json::{JsonLine, TokenClass};
use crate::theme::{token_color, HedgehogTheme};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

pub struct JsonHighlighter<'a> {
    pub theme: &'a HedgehogTheme,
    pub indent: &'a str,
}

impl<'a> JsonHighlighter<'a> {
    pub fn new(theme: &'a HedgehogTheme) -> Self {
        Self { theme, indent: "  " }
    }

    pub fn highlight(&self, lines: &[JsonLine]) -> Vec<Line<'static>> {
        lines.iter().map(|line| self.highlight_line(line)).collect()
    }

    pub fn highlight_line(&self, line: &JsonLine) -> Line<'static> {
        let mut spans = Vec::with_capacity(line.spans.len() + 1);
        if line.depth > 0 {
            spans.push(Span::raw(self.indent.repeat(line.depth)));
        }
        for span in &line.spans {
            let mut style = Style::default().fg(token_color(span.class, self.theme));
            if span.class == TokenClass::Placeholder {
                style = style.add_modifier(Modifier::ITALIC);
            }
            spans.push(Span::styled(span.text.clone(), style));
        }
        Line::from(spans)
    }
}
