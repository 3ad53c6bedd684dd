use anyhow::Result;
use colored::Colorize;

use crate::{
    app::{init_config, Config},
    chat::HttpChatClient,
    session::SessionManager,
};

use super::Commands;

/// Handle CLI subcommands. Returns `false` for the chat front ends.
pub async fn handle_command(
    command: &Commands,
    config: &Config,
    session: &mut SessionManager,
) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing Natlang configuration...");
            let path = init_config()?;
            println!("Configuration ready at: {}", path.display());
            Ok(true)
        }
        Commands::Session => {
            println!("{}", session.resolve());
            Ok(true)
        }
        Commands::Status => {
            show_status(config).await?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Chat | Commands::Repl => Ok(false),
    }
}

/// Show version information
pub fn show_version() {
    println!("Natlang v{}", env!("CARGO_PKG_VERSION"));
    println!("   Terminal client for the Natlang utility chat service");
}

/// Probe the chat service and print what it reports
async fn show_status(config: &Config) -> Result<()> {
    println!("Natlang Status:");
    println!();

    let client = HttpChatClient::new(config.server.api_base.clone())?;
    match client.health().await {
        Ok(body) => {
            println!("  [OK] Chat service: {}", client.api_base().green());
            if let Some(gemini) = body.get("gemini_configured").and_then(|v| v.as_bool()) {
                let label = if gemini { "configured".green() } else { "not configured".yellow() };
                println!("      • Sentiment analyzer: {}", label);
            }
        }
        Err(e) => {
            println!("  [ERROR] Chat service: {} ({})", client.api_base().red(), e);
        }
    }

    match config.session_store_path() {
        Ok(path) if path.exists() => println!("  [OK] Session file: {}", path.display()),
        Ok(path) => println!("  [WARNING] Session file: {} (not created yet)", path.display()),
        Err(e) => println!("  [ERROR] Session file: {}", e),
    }

    if let Some(account) = &config.client.account_number {
        println!("  [OK] Account number: {}", account);
    }

    println!();
    Ok(())
}
