use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a card's playable media (the external video ID).
///
/// This is the identity of a card within its deck; decoy playlist entries
/// share the media id of the entry they were cloned from.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// Creates a new `MediaId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the underlying string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MediaId({})", self.0)
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_id_display() {
        let id = MediaId::new("dQw4w9WgXcQ");
        assert_eq!(id.to_string(), "dQw4w9WgXcQ");
    }

    #[test]
    fn media_id_equality() {
        assert_eq!(MediaId::new("abc"), MediaId::new("abc"));
        assert_ne!(MediaId::new("abc"), MediaId::new("abd"));
    }

    #[test]
    fn media_id_into_string_roundtrip() {
        let id = MediaId::new("xyz");
        assert_eq!(MediaId::new(id.clone().into_string()), id);
    }
}
