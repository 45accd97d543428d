//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHelp,
    Back,
    FocusRight,
    FocusLeft,
    MoveUp,
    MoveDown,
    HalfPageUp,
    HalfPageDown,
    Top,
    Bottom,
    QuickSelect(usize),
    Select,
    OpenSearch,
    Pivot,
    Refresh,
    ToggleFlag,
    ToggleFold,
    ToggleFoldAll,
    CopyJson,
    CopyId,
    Dismiss,
}

/// Map a key press outside of any modal to an action.
pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('d') => Some(Action::HalfPageDown),
            KeyCode::Char('u') => Some(Action::HalfPageUp),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(Action::FocusRight),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Some(Action::FocusLeft),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::Top),
        KeyCode::End | KeyCode::Char('G') => Some(Action::Bottom),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('p') => Some(Action::Pivot),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('t') => Some(Action::ToggleFlag),
        KeyCode::Char(' ') => Some(Action::ToggleFold),
        KeyCode::Char('Z') => Some(Action::ToggleFoldAll),
        KeyCode::Char('y') => Some(Action::CopyJson),
        KeyCode::Char('c') => Some(Action::CopyId),
        KeyCode::Char('x') => Some(Action::Dismiss),
        KeyCode::Char(c @ '1'..='3') => Some(Action::QuickSelect(c as usize - '1' as usize)),
        _ => None,
    }
}
