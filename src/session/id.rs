use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{SESSION_ID_PREFIX, SESSION_ID_RANDOM_LEN};

/// Opaque token correlating every turn of one conversation with the service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap an existing token. Callers are expected to pass a trimmed, non-empty value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a fresh identifier such as `s-3f9a0c1b7e42`.
    ///
    /// 48 random bits from a v4 UUID keeps collisions negligible for
    /// interactive use.
    pub fn generate() -> Self {
        let random = uuid::Uuid::new_v4().simple().to_string();
        Self(format!(
            "{}{}",
            SESSION_ID_PREFIX,
            &random[..SESSION_ID_RANDOM_LEN]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_format() {
        let id = SessionId::generate();
        let s = id.as_str();
        assert!(s.starts_with("s-"));
        assert_eq!(s.len(), 2 + SESSION_ID_RANDOM_LEN);
        assert!(s[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_ids_differ() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| SessionId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
