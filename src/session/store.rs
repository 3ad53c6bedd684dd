use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::utils::NatlangError;

/// Client-side persistent storage for the last-used session identifier
pub trait SessionStore: Send {
    /// Read the stored identifier, if any
    fn load(&self) -> Result<Option<String>, NatlangError>;

    /// Overwrite the stored identifier
    fn save(&mut self, session_id: &str) -> Result<(), NatlangError>;
}

/// On-disk layout: a single key
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    natlang_session_id: Option<String>,
}

/// Session store backed by a small TOML file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, NatlangError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let file: SessionFile = toml::from_str(&content)?;
        Ok(file
            .natlang_session_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    fn save(&mut self, session_id: &str) -> Result<(), NatlangError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = SessionFile {
            natlang_session_id: Some(session_id.to_string()),
        };
        fs::write(&self.path, toml::to_string_pretty(&file)?)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    /// Current stored value
    pub fn get(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>, NatlangError> {
        Ok(self.get().filter(|s| !s.trim().is_empty()))
    }

    fn save(&mut self, session_id: &str) -> Result<(), NatlangError> {
        *self.slot.lock() = Some(session_id.to_string());
        Ok(())
    }
}
