use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme::Theme;

const BINDINGS: &[(&str, &str)] = &[
    ("Tab", "switch panel focus"),
    ("j/k, ↓/↑", "move / scroll"),
    ("Enter", "select document / open citation"),
    ("i, /", "edit the question"),
    ("s", "toggle scope (this document / all documents)"),
    ("n / N", "next / previous citation"),
    ("x", "delete document under cursor"),
    ("v", "fetch document for viewing"),
    ("r", "refresh document list"),
    ("?", "toggle this help"),
    ("q, Ctrl+C", "quit"),
];

/// Render the help overlay, centered.
pub fn render(f: &mut Frame, theme: &Theme) {
    let width = 56.min(f.area().width);
    let height = (BINDINGS.len() as u16 + 2).min(f.area().height);

    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(f.area());
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);

    f.render_widget(Clear, area);

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!(" {key:<12}"), Style::default().fg(theme.accent)),
                Span::styled((*what).to_string(), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Keys ")
        .border_style(Style::default().fg(theme.accent));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
