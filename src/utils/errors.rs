use thiserror::Error;

/// Main error type for Natlang
#[derive(Error, Debug)]
pub enum NatlangError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Session storage error: {0}")]
    StorageError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl From<toml::de::Error> for NatlangError {
    fn from(err: toml::de::Error) -> Self {
        NatlangError::StorageError(err.to_string())
    }
}

impl From<toml::ser::Error> for NatlangError {
    fn from(err: toml::ser::Error) -> Self {
        NatlangError::StorageError(err.to_string())
    }
}
