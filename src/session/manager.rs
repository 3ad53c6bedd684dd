//! SessionManager - owns the durable session identifier.

use tracing::{debug, warn};

use super::id::SessionId;
use super::store::SessionStore;

/// Resolves the session identifier and keeps storage in sync with it.
///
/// The manager holds the value of the user-editable session-id field next to
/// the store, so the field and the persisted key never drift apart.
pub struct SessionManager {
    store: Box<dyn SessionStore>,
    field: String,
}

impl SessionManager {
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        Self {
            store,
            field: String::new(),
        }
    }

    /// Start with an explicit value in the session-id field
    pub fn with_field(store: Box<dyn SessionStore>, field: impl Into<String>) -> Self {
        Self {
            store,
            field: field.into(),
        }
    }

    /// Current content of the session-id field
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Mutable access for front ends that edit the field in place
    pub fn field_mut(&mut self) -> &mut String {
        &mut self.field
    }

    /// Replace the session-id field (an explicit user override)
    pub fn set_field(&mut self, value: impl Into<String>) {
        self.field = value.into();
    }

    /// Pick the identifier: explicit field, then storage, then a fresh one.
    ///
    /// The chosen value is written back to the field and to storage. Storage
    /// failures are logged and never fail resolution.
    pub fn resolve(&mut self) -> SessionId {
        let explicit = self.field.trim();
        let id = if !explicit.is_empty() {
            SessionId::new(explicit)
        } else {
            match self.store.load() {
                Ok(Some(stored)) => SessionId::new(stored),
                Ok(None) => {
                    let fresh = SessionId::generate();
                    debug!(session_id = %fresh, "generated new session id");
                    fresh
                }
                Err(e) => {
                    warn!(error = %e, "could not read stored session id, generating a new one");
                    SessionId::generate()
                }
            }
        };

        self.field = id.as_str().to_string();
        if let Err(e) = self.store.save(id.as_str()) {
            warn!(error = %e, session_id = %id, "could not persist session id");
        }
        id
    }
}
