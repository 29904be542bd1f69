use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use askdocs_core::DocStatus;

use crate::app::{App, Focus};

const PROGRESS_CELLS: u16 = 10;

/// Render the document list panel with per-document ingestion progress.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Documents;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Documents ")
        .border_style(Style::default().fg(if focused { theme.accent } else { theme.border }));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.entries.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No documents uploaded yet.",
            Style::default().fg(theme.dim),
        )));
        f.render_widget(empty, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::with_capacity(app.entries.len());
    for (i, entry) in app.entries.iter().enumerate() {
        let is_cursor = focused && i == app.cursor;
        let is_selected = app.selected == Some(i);

        let marker = if is_selected { "▸ " } else { "  " };
        let mut name_style = Style::default().fg(theme.text);
        if is_cursor {
            name_style = name_style.add_modifier(Modifier::REVERSED);
        }

        let mut spans = vec![
            Span::styled(marker.to_string(), Style::default().fg(theme.accent)),
            Span::styled(format!("{:<24.24}", entry.name), name_style),
            Span::raw(" "),
        ];

        if entry.status.is_terminal() {
            spans.push(Span::styled(
                entry.status.label().to_string(),
                Style::default().fg(theme.status_color(entry.status)),
            ));
        } else {
            spans.push(progress_bar(entry.status, theme));
            spans.push(Span::raw(" "));
            let status_style = if entry.stalled {
                Style::default().fg(theme.stalled)
            } else {
                Style::default().fg(theme.dim)
            };
            spans.push(Span::styled(entry.status_label(), status_style));
        }

        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// A small textual progress bar driven by the status percentage.
fn progress_bar(status: DocStatus, theme: &crate::theme::Theme) -> Span<'static> {
    let pct = status.progress_pct();
    let filled = (u32::from(pct) * u32::from(PROGRESS_CELLS) / 100) as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(PROGRESS_CELLS as usize - filled);
    Span::styled(bar, Style::default().fg(theme.progress_done))
}
