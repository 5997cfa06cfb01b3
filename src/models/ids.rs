//! Player and session identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Canonical player identifier.
///
/// The decoder emits the same account id in mixed case in some records and in
/// upper case in others, so every id is upper-cased on construction and
/// compared with plain equality afterwards.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

/// Opaque token handed to the browser after an upload.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random token (32 hex characters, no dashes).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_is_upper_cased() {
        let id = PlayerId::new("ab12cd34ef");
        assert_eq!(id.as_str(), "AB12CD34EF");
    }

    #[test]
    fn test_player_id_case_insensitive_equality() {
        assert_eq!(PlayerId::from("abcDEF"), PlayerId::from("ABCdef"));
        assert_ne!(PlayerId::from("abc"), PlayerId::from("abd"));
    }

    #[test]
    fn test_player_id_deserialize_normalizes() {
        let id: PlayerId = serde_json::from_str("\"c0ffee\"").unwrap();
        assert_eq!(id, PlayerId::new("C0FFEE"));
    }

    #[test]
    fn test_player_id_display() {
        let id = PlayerId::new("abc123");
        assert_eq!(format!("{}", id), "ABC123");
        assert!(format!("{:?}", id).contains("ABC123"));
    }

    #[test]
    fn test_session_id_format() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_session_id_is_not_normalized() {
        let id = SessionId::from("AbC");
        assert_eq!(id.as_str(), "AbC");
    }
}
