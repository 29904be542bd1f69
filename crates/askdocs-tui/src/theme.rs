use ratatui::style::Color;

/// Color palette for the UI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    /// Citation chips inside the answer.
    pub citation: Color,
    pub progress_done: Color,
    pub progress_todo: Color,
    pub indexed: Color,
    pub failed: Color,
    pub stalled: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            border: Color::DarkGray,
            citation: Color::LightBlue,
            progress_done: Color::Blue,
            progress_todo: Color::DarkGray,
            indexed: Color::Green,
            failed: Color::Red,
            stalled: Color::Yellow,
        }
    }

    pub fn light() -> Self {
        Self {
            text: Color::Black,
            dim: Color::Gray,
            accent: Color::Blue,
            border: Color::Gray,
            citation: Color::Blue,
            progress_done: Color::Blue,
            progress_todo: Color::Gray,
            indexed: Color::Green,
            failed: Color::Red,
            stalled: Color::Magenta,
        }
    }

    /// Color for a document's status text.
    pub fn status_color(&self, status: askdocs_core::DocStatus) -> Color {
        use askdocs_core::DocStatus;
        match status {
            DocStatus::Indexed => self.indexed,
            DocStatus::Failed => self.failed,
            _ => self.dim,
        }
    }
}
