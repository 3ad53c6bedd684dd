use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::chat::{PendingSend, SendOutcome};
use crate::constants::{OUTCOME_CHANNEL_CAPACITY, UI_REFRESH_INTERVAL_MS};
use crate::tui::app::App;
use crate::tui::input::InputHandler;
use crate::tui::render::render_ui;

/// Run the terminal UI
pub async fn run_ui(mut app: App) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("Natlang chat requires an interactive terminal.");
        eprintln!("   For pipes and scripts use: natlang --prompt \"...\" or natlang repl");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Replies come back here from spawned requests
    let (tx, mut rx) = mpsc::channel::<SendOutcome>(OUTCOME_CHANNEL_CAPACITY);

    let res = run_app(&mut terminal, &mut app, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Send a request on its own task so input stays responsive
fn spawn_send(pending: PendingSend, tx: &mpsc::Sender<SendOutcome>) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = pending.dispatch().await;
        if tx.send(outcome).await.is_err() {
            tracing::debug!("UI closed before reply arrived");
        }
    });
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tx: mpsc::Sender<SendOutcome>,
    rx: &mut mpsc::Receiver<SendOutcome>,
) -> Result<()> {
    let handler = InputHandler::new();

    while app.running {
        app.sync_scroll();
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = handler.handle_key(app.state, key);
                    if let Some(pending) = app.apply_action(action) {
                        spawn_send(pending, &tx);
                    }
                }
            }
        }

        // Apply every reply that arrived, in arrival order
        while let Ok(outcome) = rx.try_recv() {
            app.controller.complete(outcome);
        }
    }

    Ok(())
}
