use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_API_BASE, DEFAULT_LOG_LEVEL, LOG_FILE_NAME, SESSION_FILE_NAME};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote chat service
    #[serde(default)]
    pub server: ServerConfig,

    /// Defaults for the client-side input fields
    #[serde(default)]
    pub client: ClientConfig,

    /// Session persistence
    #[serde(default)]
    pub session: SessionConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,

    /// Diagnostics
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL; `/chat` and `/healthz` are appended
    pub api_base: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Pre-filled account number
    pub account_number: Option<String>,
    /// Pre-filled session id (an explicit override)
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Where the session id is persisted (defaults to the data directory)
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Show ticket / correlation id / meta under bot replies
    pub show_metadata: bool,
    /// Prefix messages with their local time
    pub show_timestamps: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            show_metadata: true,
            show_timestamps: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
    /// Log file for the terminal UI (defaults to the data directory)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Resolved session file location
    pub fn session_store_path(&self) -> Result<PathBuf> {
        match &self.session.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(get_data_dir()?.join(SESSION_FILE_NAME)),
        }
    }

    /// Resolved log file location
    pub fn log_file_path(&self) -> Result<PathBuf> {
        match &self.logging.file {
            Some(path) => Ok(path.clone()),
            None => Ok(get_data_dir()?.join(LOG_FILE_NAME)),
        }
    }
}

/// Layer defaults, global file, local file and environment
fn build_figment(global_config: Option<&Path>, local_config: &Path) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(global) = global_config {
        if global.exists() {
            figment = figment.merge(Toml::file(global));
        }
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(local_config));
    }

    // NATLANG_SERVER__API_BASE -> server.api_base
    figment.merge(Env::prefixed("NATLANG_").split("__"))
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".natlang/config.toml");

    build_figment(Some(&global_config), &local_config)
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from an explicit file, still honoring the environment
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NATLANG_").split("__"))
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "natlang") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("natlang");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Get the data directory (session file, log file)
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "natlang") {
        Ok(proj_dirs.data_dir().to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".local").join("share").join("natlang"))
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
    }

    Ok(config_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.api_base, "http://127.0.0.1:8000");
        assert!(config.client.account_number.is_none());
        assert!(config.ui.show_metadata);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_local_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("config.toml");
        std::fs::write(
            &local,
            "[server]\napi_base = \"http://chat.internal:9000\"\n\n[client]\naccount_number = \"ACCT-BOWIE\"\n",
        )
        .unwrap();

        let config: Config = build_figment(None, &local).extract().unwrap();
        assert_eq!(config.server.api_base, "http://chat.internal:9000");
        assert_eq!(config.client.account_number.as_deref(), Some("ACCT-BOWIE"));
        assert!(config.ui.show_metadata);
    }

    #[test]
    fn test_save_then_load_from() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = Config::default();
        config.session.store_path = Some(temp_dir.path().join("sid.toml"));
        save_config(&config, Some(path.clone())).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.session_store_path().unwrap(), temp_dir.path().join("sid.toml"));
    }

    #[test]
    fn test_load_from_missing_file() {
        assert!(load_config_from(Path::new("/definitely/not/here.toml")).is_err());
    }
}
