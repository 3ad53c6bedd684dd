use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::{
    app::{load_config, load_config_from, Config},
    chat::{ConversationController, HttpChatClient},
    cli::{handle_command, Cli, Commands},
    session::{FileSessionStore, MemorySessionStore, SessionManager, SessionStore},
    tui::{run_ui, App},
    utils::{init_logger, LogTarget},
};

use super::line_mode::LineMode;

/// Load configuration and fold CLI overrides into it
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        load_config_from(config_path)?
    } else {
        match load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("⚠️  Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    };

    // CLI > environment > files > defaults
    if let Some(api_base) = &cli.api_base {
        config.server.api_base = api_base.clone();
    }
    if let Some(account) = &cli.account {
        config.client.account_number = Some(account.clone());
    }
    if let Some(session_id) = &cli.session_id {
        config.client.session_id = Some(session_id.clone());
    }

    Ok(config)
}

/// Session manager over the configured store, with the field pre-filled
pub fn build_session_manager(config: &Config, ephemeral: bool) -> Result<SessionManager> {
    let store: Box<dyn SessionStore> = if ephemeral {
        Box::new(MemorySessionStore::new())
    } else {
        Box::new(FileSessionStore::new(config.session_store_path()?))
    };
    let field = config.client.session_id.clone().unwrap_or_default();
    Ok(SessionManager::with_field(store, field))
}

/// Controller wired to the HTTP transport
pub fn build_controller(config: &Config, ephemeral: bool) -> Result<ConversationController> {
    let session = build_session_manager(config, ephemeral)?;
    let transport = HttpChatClient::new(config.server.api_base.clone())
        .context("Failed to build HTTP client")?;

    let mut controller = ConversationController::new(session, Arc::new(transport));
    if let Some(account) = &config.client.account_number {
        controller.set_account(account.clone());
    }
    Ok(controller)
}

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli)?;
        Ok(Self { cli, config })
    }

    fn log_level(&self) -> &str {
        if self.cli.verbose {
            "debug"
        } else {
            &self.config.logging.level
        }
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        let command = self.cli.command.clone().unwrap_or(Commands::Chat);

        match command {
            Commands::Chat => self.run_chat().await,
            Commands::Repl => {
                init_logger(self.log_level(), LogTarget::Stderr)?;
                let controller = build_controller(&self.config, self.cli.ephemeral)?;
                LineMode::new(controller, self.config.ui.show_metadata)
                    .run()
                    .await
            }
            other => {
                init_logger(self.log_level(), LogTarget::Stderr)?;
                let mut session = build_session_manager(&self.config, self.cli.ephemeral)?;
                handle_command(&other, &self.config, &mut session).await?;
                Ok(())
            }
        }
    }

    async fn run_chat(&self) -> Result<()> {
        // Screen belongs to the UI; diagnostics go to a file
        let log_path = self.config.log_file_path()?;
        init_logger(self.log_level(), LogTarget::File(&log_path))?;

        let mut controller = build_controller(&self.config, self.cli.ephemeral)?;
        let session_id = controller.initialize();
        info!(%session_id, api_base = %self.config.server.api_base, "starting chat UI");

        let app = App::new(controller, &self.config);
        run_ui(app).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[server]\napi_base = \"http://from-file:1\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "natlang",
            "--config",
            path.to_str().unwrap(),
            "--api-base",
            "http://from-cli:2",
            "--session-id",
            "R24",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.server.api_base, "http://from-cli:2");
        assert_eq!(config.client.session_id.as_deref(), Some("R24"));
    }

    #[test]
    fn test_session_manager_prefills_field() {
        let mut config = Config::default();
        config.client.session_id = Some("R25".to_string());
        let mut manager = build_session_manager(&config, true).unwrap();
        assert_eq!(manager.resolve().as_str(), "R25");
    }

    #[test]
    fn test_controller_prefills_account() {
        let mut config = Config::default();
        config.client.account_number = Some("ACCT-PRINCE".to_string());
        let controller = build_controller(&config, true).unwrap();
        assert_eq!(controller.account(), "ACCT-PRINCE");
    }
}
