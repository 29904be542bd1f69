pub mod documents;
pub mod help;
pub mod qa;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Focus, InputMode};

/// Render the whole screen: title bar, panels, footer, overlays.
pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let [title_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_title(f, app, title_area);

    let panel_width = if body_area.width > 120 {
        45
    } else {
        (body_area.width / 3).max(30)
    };
    let [docs_area, qa_area] =
        Layout::horizontal([Constraint::Length(panel_width), Constraint::Min(40)])
            .areas(body_area);

    documents::render_in(f, app, docs_area);
    qa::render_in(f, app, qa_area);

    render_footer(f, app, footer_area);

    if app.show_help {
        help::render(f, &app.theme);
    }
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let total = app.entries.len();
    let ready = app
        .entries
        .iter()
        .filter(|e| e.status == askdocs_core::DocStatus::Indexed)
        .count();

    let line = Line::from(vec![
        Span::styled(" askdocs ", Style::default().fg(theme.accent)),
        Span::styled(
            format!("{ready}/{total} indexed "),
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = if let Some(message) = &app.status_line {
        Line::from(Span::styled(
            message.clone(),
            Style::default().fg(theme.accent),
        ))
    } else {
        let keys = match (app.focus, &app.input_mode) {
            (_, InputMode::Query) => "Enter ask · Esc cancel",
            (Focus::Documents, _) => {
                "Tab panel · j/k move · Enter select · i ask · x delete · v fetch · r refresh · ? help · q quit"
            }
            (Focus::Answer, _) => {
                "Tab panel · i ask · s scope · n/N citation · Enter open citation · ? help · q quit"
            }
        };
        Line::from(Span::styled(keys, Style::default().fg(theme.dim)))
    };
    f.render_widget(Paragraph::new(line), area);
}
