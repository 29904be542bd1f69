use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::Query => map_key_query(key),
            }
        }
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Enter => Action::DrillIn,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Tab => Action::FocusNext,
        KeyCode::Char('i') | KeyCode::Char('/') => Action::StartQuery,
        KeyCode::Char('s') => Action::ToggleScope,
        KeyCode::Char('x') => Action::DeleteDoc,
        KeyCode::Char('v') => Action::ViewDoc,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('n') => Action::NextCitation,
        KeyCode::Char('N') => Action::PrevCitation,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

fn map_key_query(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::QueryCancel,
        KeyCode::Enter => Action::QuerySubmit,
        KeyCode::Char(c) => Action::QueryInput(c),
        KeyCode::Backspace => Action::QueryInput('\x08'), // sentinel for backspace
        _ => Action::None,
    }
}
