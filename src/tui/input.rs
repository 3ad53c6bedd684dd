use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::constants::{UI_PAGE_LINES, UI_SCROLL_LINES};
use crate::tui::app::AppState;

/// Maps key presses to actions for the current mode
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Process a key event
    pub fn handle_key(&self, state: AppState, key: KeyEvent) -> InputAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return InputAction::Quit;
        }

        match key.code {
            KeyCode::Tab => return InputAction::NextFocus,
            KeyCode::BackTab => return InputAction::PrevFocus,
            KeyCode::PageUp => return InputAction::ScrollUp(UI_PAGE_LINES),
            KeyCode::PageDown => return InputAction::ScrollDown(UI_PAGE_LINES),
            _ => {}
        }

        match state {
            AppState::Insert => match key.code {
                KeyCode::Enter => InputAction::Submit,
                KeyCode::Esc => InputAction::Cancel,
                KeyCode::Char(c) => InputAction::Insert(c),
                KeyCode::Backspace => InputAction::Delete,
                KeyCode::Left => InputAction::ButtonPrev,
                KeyCode::Right => InputAction::ButtonNext,
                _ => InputAction::None,
            },
            AppState::Normal => match key.code {
                KeyCode::Char('q') => InputAction::Quit,
                KeyCode::Char('i') | KeyCode::Enter => InputAction::EnterInsert,
                KeyCode::Char(':') => InputAction::EnterCommand,
                KeyCode::Up | KeyCode::Char('k') => InputAction::ScrollUp(UI_SCROLL_LINES),
                KeyCode::Down | KeyCode::Char('j') => InputAction::ScrollDown(UI_SCROLL_LINES),
                _ => InputAction::None,
            },
            AppState::Command => match key.code {
                KeyCode::Enter => InputAction::Submit,
                KeyCode::Esc => InputAction::Cancel,
                KeyCode::Char(c) => InputAction::Insert(c),
                KeyCode::Backspace => InputAction::Delete,
                _ => InputAction::None,
            },
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    Cancel,
    Insert(char),
    Delete,
    NextFocus,
    PrevFocus,
    ButtonPrev,
    ButtonNext,
    ScrollUp(u16),
    ScrollDown(u16),
    EnterInsert,
    EnterCommand,
    Quit,
    None,
}
