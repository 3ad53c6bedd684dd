use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::chat::{Phase, Role};
use crate::render::{escape_terminal, format_metadata};
use crate::tui::app::{App, AppState, Focus};

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(5),    // Chat log
            Constraint::Length(3), // Message input
            Constraint::Length(3), // Session and account
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_chat(frame, chunks[1], app);
    render_message_input(frame, chunks[2], app);

    let field_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    render_field(frame, field_chunks[0], app, Focus::Session);
    render_field(frame, field_chunks[1], app, Focus::Account);

    render_status_bar(frame, chunks[4], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header = Line::from(vec![
        Span::styled(
            "Natlang",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Server: "),
        Span::styled(app.api_base.clone(), Style::default().fg(Color::Green)),
        Span::raw(" | Session: "),
        Span::styled(
            app.controller.session().field().to_string(),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(header)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

/// Split text into lines no wider than `width` characters
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            lines.push(chunk.iter().collect());
        }
    }
    lines
}

/// Build the log lines. Every message text goes through terminal escaping.
fn chat_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut button_index = 0;
    let buttons_focused = app.focus == Focus::Buttons;

    for message in app.controller.transcript().messages() {
        let (label, color) = match message.role {
            Role::User => ("You", Color::Green),
            Role::Bot => ("Natlang", Color::Cyan),
        };
        let mut header = vec![Span::styled(
            format!("{}:", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if app.show_timestamps {
            header.push(Span::styled(
                format!(" {}", message.timestamp.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(header));

        let text = escape_terminal(&message.text);
        for line in wrap_text(&text, width) {
            lines.push(Line::from(Span::raw(line)));
        }

        if !message.affordances.is_empty() {
            let mut spans = Vec::new();
            for button in &message.affordances {
                let style = if buttons_focused && button_index == app.selected_button {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                spans.push(Span::styled(
                    format!("[ {} ]", escape_terminal(&button.label)),
                    style,
                ));
                spans.push(Span::raw(" "));
                button_index += 1;
            }
            lines.push(Line::from(spans));
        }

        if app.show_metadata && !message.metadata.is_empty() {
            let meta = escape_terminal(&format_metadata(&message.metadata)).into_owned();
            for line in wrap_text(&meta, width) {
                lines.push(Line::from(Span::styled(
                    line,
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        lines.push(Line::from(""));
    }

    lines
}

fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2);
    let lines = chat_lines(app, inner_width);

    // Bottom-anchored: scroll_back counts lines up from the newest entry
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(inner_height);
    let offset = max_scroll.saturating_sub(app.scroll_back);

    let chat = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Conversation ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .scroll((offset, 0));

    frame.render_widget(chat, area);
}

fn border_style(app: &App, focus: Focus) -> Style {
    if app.state == AppState::Insert && app.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Place the cursor after the last visible character of a one-line box
fn place_cursor(frame: &mut Frame, area: Rect, text: &str) {
    let max = area.width.saturating_sub(2);
    let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX).min(max);
    frame.set_cursor_position((area.x + 1 + len, area.y + 1));
}

fn render_message_input(frame: &mut Frame, area: Rect, app: &App) {
    if app.state == AppState::Command {
        let text = format!(":{}", app.command);
        let command = Paragraph::new(text.clone()).block(
            Block::default()
                .title(" Command ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        );
        frame.render_widget(command, area);
        place_cursor(frame, area, &text);
        return;
    }

    let title = if app.focus == Focus::Buttons {
        " Message (Enter sends the highlighted button) "
    } else {
        " Message "
    };
    let input = escape_terminal(app.controller.input()).into_owned();
    let widget = Paragraph::new(input.clone()).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(app, Focus::Message)),
    );
    frame.render_widget(widget, area);

    if app.state == AppState::Insert && app.focus == Focus::Message {
        place_cursor(frame, area, &input);
    }
}

fn render_field(frame: &mut Frame, area: Rect, app: &App, focus: Focus) {
    let (title, value) = match focus {
        Focus::Session => (" Session ID ", app.controller.session().field()),
        _ => (" Account Number ", app.controller.account()),
    };
    let value = escape_terminal(value).into_owned();
    let widget = Paragraph::new(value.clone()).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(app, focus)),
    );
    frame.render_widget(widget, area);

    if app.state == AppState::Insert && app.focus == focus {
        place_cursor(frame, area, &value);
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (mode, mode_color) = match app.state {
        AppState::Normal => ("NORMAL", Color::Blue),
        AppState::Insert => ("INSERT", Color::Green),
        AppState::Command => ("COMMAND", Color::Magenta),
    };

    let phase = match app.controller.phase() {
        Phase::Idle => Span::styled("Ready", Style::default().fg(Color::Green)),
        Phase::Sending { in_flight } => Span::styled(
            format!("Sending ({})...", in_flight),
            Style::default().fg(Color::Yellow),
        ),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode),
            Style::default()
                .fg(Color::Black)
                .bg(mode_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        phase,
        Span::raw(" | "),
    ];

    match &app.status_message {
        Some(status) => spans.push(Span::styled(
            escape_terminal(status).into_owned(),
            Style::default().fg(Color::White),
        )),
        None => spans.push(Span::styled(
            "Tab: field | Enter: send | Esc: normal | :help",
            Style::default().fg(Color::DarkGray),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::chat::{ChatReply, ChatTransport, ConversationController, OutboundRequest, SendError};
    use crate::session::{MemorySessionStore, SessionManager};
    use async_trait::async_trait;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct Silent;

    #[async_trait]
    impl ChatTransport for Silent {
        async fn post_chat(&self, _request: &OutboundRequest) -> Result<ChatReply, SendError> {
            Ok(ChatReply::new("ok"))
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_draws_greeting_fields_and_status() {
        let session = SessionManager::new(Box::new(MemorySessionStore::with_value("s-draw")));
        let mut controller = ConversationController::new(session, Arc::new(Silent));
        controller.initialize();
        controller.set_account("ACCT-9");
        let app = App::new(controller, &Config::default());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render_ui(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("welcome to Natlang"));
        assert!(text.contains("[ Billing ]"));
        assert!(text.contains("[ Outage Assist ]"));
        assert!(text.contains("Session ID"));
        assert!(text.contains("ACCT-9"));
        assert!(text.contains("INSERT"));
        assert!(text.contains("Ready"));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_text_zero_width() {
        assert_eq!(wrap_text("ab", 0), vec!["a", "b"]);
    }
}
