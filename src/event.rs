use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Actions decoded from terminal events. Letters are always delivered as
/// `Input` so the listing can decide whether they navigate or filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Quit the application
    Quit,
    /// Navigate the listing cursor down
    Down,
    /// Navigate the listing cursor up
    Up,
    PageDown,
    PageUp,
    Home,
    End,
    /// Confirm the highlighted entry
    Confirm,
    /// A raw input character
    Input(char),
    /// Backspace in the filter
    Backspace,
    /// Escape / cancel
    Escape,
    /// Keep the typed filter and go back to navigating
    Accept,
    /// No-op
    None,
}

pub fn map_event(event: &Event) -> Action {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) if *kind != KeyEventKind::Release => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Down => Action::Down,
            KeyCode::Up => Action::Up,
            KeyCode::PageDown | KeyCode::Right => Action::PageDown,
            KeyCode::PageUp | KeyCode::Left => Action::PageUp,
            KeyCode::Home => Action::Home,
            KeyCode::End => Action::End,
            KeyCode::Enter => Action::Confirm,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Esc => Action::Escape,
            KeyCode::Tab => Action::Accept,
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => Action::None,
            KeyCode::Char(ch) => Action::Input(*ch),
            _ => Action::None,
        },
        _ => Action::None,
    }
}
