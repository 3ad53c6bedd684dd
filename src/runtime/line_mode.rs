use anyhow::Result;
use colored::Colorize;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::{
    chat::{Button, ConversationController, Role, Transcript},
    render::render_message_plain,
};

/// What a line typed at the prompt means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineInput {
    Empty,
    /// A digit picking one of the newest buttons
    Activate(Button),
    SetAccount(String),
    SetSession(String),
    Text(String),
}

/// Interpret one line against the current transcript
pub fn parse_line(line: &str, transcript: &Transcript) -> LineInput {
    let line = line.trim();
    if line.is_empty() {
        return LineInput::Empty;
    }

    if let Ok(n) = line.parse::<usize>() {
        let buttons = transcript.latest_buttons();
        if (1..=buttons.len()).contains(&n) {
            return LineInput::Activate(buttons[n - 1].clone());
        }
    }

    if let Some(value) = strip_prefix_ignore_case(line, "acct=") {
        return LineInput::SetAccount(value.trim().to_string());
    }
    if let Some(value) = strip_prefix_ignore_case(line, "sid=") {
        return LineInput::SetSession(value.trim().to_string());
    }

    LineInput::Text(line.to_string())
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}

/// Line-oriented client on stdin/stdout
pub struct LineMode {
    controller: ConversationController,
    show_metadata: bool,
    printed: usize,
}

impl LineMode {
    pub fn new(controller: ConversationController, show_metadata: bool) -> Self {
        Self {
            controller,
            show_metadata,
            printed: 0,
        }
    }

    /// Print bot messages appended since the last call; user turns were typed by hand
    fn print_new_messages(&mut self) {
        let messages = self.controller.transcript().messages();
        for message in &messages[self.printed..] {
            if message.role == Role::Bot {
                println!("{}", render_message_plain(message, self.show_metadata));
            }
        }
        self.printed = messages.len();
    }

    pub async fn run(mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run_with(stdin, tokio::signal::ctrl_c()).await
    }

    /// Drive the prompt over `input` until EOF or until `interrupt` fires.
    ///
    /// One interrupt future lives for the whole loop and is raced against
    /// every await, so an interrupt during a send is never lost.
    async fn run_with<R, I>(&mut self, input: R, interrupt: I) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        I: Future,
    {
        let session_id = self.controller.initialize();
        println!("{}", format!("Session: {}", session_id).dimmed());
        self.print_new_messages();
        println!(
            "{}",
            "Type a number to pick an option, acct=<number> to set your account, sid=<id> to switch session. Ctrl+D to exit."
                .dimmed()
        );

        let mut lines = input.lines();
        tokio::pin!(interrupt);
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = &mut interrupt => None,
            };
            let Some(line) = line else {
                break;
            };

            let pending = match parse_line(&line, self.controller.transcript()) {
                LineInput::Empty => None,
                LineInput::SetAccount(account) => {
                    if account.is_empty() {
                        println!("(Account cleared)");
                    } else {
                        println!("(Account set to: {})", account);
                    }
                    self.controller.set_account(account);
                    None
                }
                LineInput::SetSession(session) => {
                    self.controller.session_mut().set_field(session);
                    let id = self.controller.session_mut().resolve();
                    println!("(Session: {})", id);
                    None
                }
                LineInput::Activate(button) => self.controller.activate(&button),
                LineInput::Text(text) => self.controller.begin(&text),
            };

            if let Some(pending) = pending {
                let outcome = tokio::select! {
                    outcome = pending.dispatch() => Some(outcome),
                    _ = &mut interrupt => None,
                };
                let Some(outcome) = outcome else {
                    break;
                };
                self.controller.complete(outcome);
            }
            self.print_new_messages();
        }

        println!("\nGoodbye!");
        Ok(())
    }
}
