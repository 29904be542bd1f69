use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use askdocs_core::Segment;

use crate::app::{App, Focus, InputMode};

/// Render the QA panel: question box, scope, streamed answer with
/// interactive citation chips.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Answer;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Ask ")
        .border_style(Style::default().fg(if focused { theme.accent } else { theme.border }));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [query_area, scope_area, answer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .areas(inner);

    render_query_box(f, app, query_area);
    render_scope_line(f, app, scope_area);
    render_answer(f, app, answer_area);
}

fn render_query_box(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let editing = app.input_mode == InputMode::Query;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { theme.accent } else { theme.border }));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = if app.answer.query.is_empty() && !editing {
        Span::styled("Ask a question... (i)", Style::default().fg(theme.dim))
    } else {
        let cursor = if editing { "▏" } else { "" };
        Span::styled(
            format!("{}{cursor}", app.answer.query),
            Style::default().fg(theme.text),
        )
    };
    f.render_widget(Paragraph::new(Line::from(text)), inner);
}

fn render_scope_line(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let scope_doc = app
        .selected_doc()
        .map(|d| d.name.clone())
        .unwrap_or_else(|| "none selected".to_string());

    let line = Line::from(vec![
        Span::styled("scope: ", Style::default().fg(theme.dim)),
        Span::styled(
            app.answer.scope.label().to_string(),
            Style::default().fg(theme.accent),
        ),
        Span::styled(
            format!("  (selected: {scope_doc}, page {})", app.page_to_view),
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Build the answer paragraph from extracted segments. Citations render
/// as highlighted chips; the one under the citation cursor is reversed.
/// Text segments are split on newlines (a span cannot hold a line break).
fn render_answer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let answer = &app.answer;

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();

    for (i, segment) in answer.segments.iter().enumerate() {
        match segment {
            Segment::Text(text) => {
                let mut parts = text.split('\n');
                if let Some(first) = parts.next()
                    && !first.is_empty()
                {
                    current.push(Span::styled(
                        first.to_string(),
                        Style::default().fg(theme.text),
                    ));
                }
                for part in parts {
                    lines.push(Line::from(std::mem::take(&mut current)));
                    if !part.is_empty() {
                        current.push(Span::styled(
                            part.to_string(),
                            Style::default().fg(theme.text),
                        ));
                    }
                }
            }
            Segment::Citation { label, .. } => {
                let mut style = Style::default()
                    .fg(theme.citation)
                    .add_modifier(Modifier::BOLD);
                if answer.citation_cursor == Some(i) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                current.push(Span::styled(label.clone(), style));
            }
        }
    }

    if answer.loading {
        current.push(Span::styled(
            if answer.answer.is_empty() {
                "...thinking..."
            } else {
                " ▌"
            },
            Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
        ));
    } else if answer.interrupted {
        current.push(Span::styled(
            " [stream interrupted]",
            Style::default().fg(theme.failed),
        ));
    }
    lines.push(Line::from(current));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((answer.scroll, 0));
    f.render_widget(paragraph, area);
}
