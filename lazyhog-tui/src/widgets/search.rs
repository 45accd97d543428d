//! Search bar widget.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub struct SearchBar<'a> {
    pub title: &'a str,
    pub query: &'a str,
    pub prompt_style: Style,
    pub text_style: Style,
    pub border_style: Style,
}

impl<'a> SearchBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("/", self.prompt_style),
            Span::styled(self.query.to_string(), self.text_style),
            Span::styled("█", self.prompt_style),
        ]);
        let paragraph = Paragraph::new(line).block(
            Block::default()
                .title(self.title)
                .borders(Borders::ALL)
                .border_style(self.border_style),
        );
        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }
}
