use std::path::Path;

use crate::app::Config;
use crate::chat::{Button, ConversationController, PendingSend};
use crate::render::render_transcript_html;
use crate::tui::input::InputAction;

/// Which input currently receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Message,
    Session,
    Account,
    Buttons,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Message => Focus::Session,
            Focus::Session => Focus::Account,
            Focus::Account => Focus::Buttons,
            Focus::Buttons => Focus::Message,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Message => Focus::Buttons,
            Focus::Buttons => Focus::Account,
            Focus::Account => Focus::Session,
            Focus::Session => Focus::Message,
        }
    }
}

/// Application state for different modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Viewing and scrolling the log
    Normal,
    /// Typing into the focused field
    Insert,
    /// Entering a `:` command
    Command,
}

/// Application state
pub struct App {
    /// Transcript, fields and request cycle
    pub controller: ConversationController,
    pub state: AppState,
    pub focus: Focus,
    /// Command buffer (without the leading ':')
    pub command: String,
    /// Index into the transcript's flattened button list
    pub selected_button: usize,
    /// Lines scrolled back from the newest entry
    pub scroll_back: u16,
    /// Transcript length at the last render
    seen_messages: usize,
    /// Is the app running?
    pub running: bool,
    pub status_message: Option<String>,
    pub api_base: String,
    pub show_metadata: bool,
    pub show_timestamps: bool,
}

impl App {
    pub fn new(controller: ConversationController, config: &Config) -> Self {
        Self {
            controller,
            state: AppState::Insert,
            focus: Focus::Message,
            command: String::new(),
            selected_button: 0,
            scroll_back: 0,
            seen_messages: 0,
            running: true,
            status_message: None,
            api_base: config.server.api_base.clone(),
            show_metadata: config.ui.show_metadata,
            show_timestamps: config.ui.show_timestamps,
        }
    }

    /// Jump to the newest entry whenever the transcript grew since the last frame
    pub fn sync_scroll(&mut self) {
        let len = self.controller.transcript().len();
        if len != self.seen_messages {
            self.seen_messages = len;
            self.scroll_back = 0;
        }
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_back = self.scroll_back.saturating_add(amount);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(amount);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Text of the focused field, if the focus is a text field
    pub fn focused_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Message => Some(self.controller.input_mut()),
            Focus::Session => Some(self.controller.session_mut().field_mut()),
            Focus::Account => Some(self.controller.account_mut()),
            Focus::Buttons => None,
        }
    }

    /// Currently highlighted button, cloned so it can be activated
    pub fn selected_button(&self) -> Option<Button> {
        self.controller
            .transcript()
            .buttons()
            .get(self.selected_button)
            .map(|b| (*b).clone())
    }

    fn move_button_selection(&mut self, forward: bool) {
        let count = self.controller.transcript().buttons().len();
        if count == 0 {
            return;
        }
        self.selected_button = if forward {
            (self.selected_button + 1) % count
        } else {
            (self.selected_button + count - 1) % count
        };
    }

    /// Send action: activate the selected button, or submit the message field
    pub fn submit(&mut self) -> Option<PendingSend> {
        self.clear_status();
        if self.focus == Focus::Buttons {
            let button = self.selected_button()?;
            self.controller.activate(&button)
        } else {
            self.controller.submit()
        }
    }

    /// Apply one input action. Returns a send that the caller must dispatch.
    pub fn apply_action(&mut self, action: InputAction) -> Option<PendingSend> {
        match (self.state, action) {
            (_, InputAction::Quit) => self.quit(),
            (_, InputAction::ScrollUp(n)) => self.scroll_up(n),
            (_, InputAction::ScrollDown(n)) => self.scroll_down(n),
            (_, InputAction::NextFocus) => self.focus = self.focus.next(),
            (_, InputAction::PrevFocus) => self.focus = self.focus.prev(),

            (AppState::Insert, InputAction::Submit) => return self.submit(),
            (AppState::Insert, InputAction::Cancel) => self.state = AppState::Normal,
            (AppState::Insert, InputAction::Insert(c)) => {
                if let Some(field) = self.focused_field_mut() {
                    field.push(c);
                }
            }
            (AppState::Insert, InputAction::Delete) => {
                if let Some(field) = self.focused_field_mut() {
                    field.pop();
                }
            }
            (AppState::Insert, InputAction::ButtonNext) if self.focus == Focus::Buttons => {
                self.move_button_selection(true)
            }
            (AppState::Insert, InputAction::ButtonPrev) if self.focus == Focus::Buttons => {
                self.move_button_selection(false)
            }

            (AppState::Normal, InputAction::EnterInsert) => self.state = AppState::Insert,
            (AppState::Normal, InputAction::EnterCommand) => {
                self.command.clear();
                self.state = AppState::Command;
            }

            (AppState::Command, InputAction::Submit) => {
                let command = std::mem::take(&mut self.command);
                self.state = AppState::Normal;
                self.run_command(&command);
            }
            (AppState::Command, InputAction::Cancel) => {
                self.command.clear();
                self.state = AppState::Normal;
            }
            (AppState::Command, InputAction::Insert(c)) => self.command.push(c),
            (AppState::Command, InputAction::Delete) => {
                if self.command.pop().is_none() {
                    self.state = AppState::Normal;
                }
            }

            _ => {}
        }
        None
    }

    /// Execute a `:` command
    pub fn run_command(&mut self, command: &str) {
        let command = command.trim();
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "quit" | "q" => self.quit(),
            "export" => {
                if arg.is_empty() {
                    self.set_status("Usage: :export <path>");
                } else {
                    self.export_transcript(Path::new(arg));
                }
            }
            "session" => {
                let id = self.controller.session_mut().resolve();
                self.set_status(format!("Session: {}", id));
            }
            "help" | "h" => self.set_status(
                "Tab: next field • Enter: send • ←/→: pick button • PgUp/PgDn: scroll • Esc then q: quit • :export <path>",
            ),
            "" => {}
            _ => self.set_status(format!("Unknown command: {}", command)),
        }
    }

    fn export_transcript(&mut self, path: &Path) {
        let session = self.controller.session().field().to_string();
        let html = render_transcript_html(self.controller.transcript(), &session);
        match std::fs::write(path, html) {
            Ok(()) => self.set_status(format!(
                "Exported {} messages to {}",
                self.controller.transcript().len(),
                path.display()
            )),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "transcript export failed");
                self.set_status(format!("Export failed: {}", e));
            }
        }
    }
}
