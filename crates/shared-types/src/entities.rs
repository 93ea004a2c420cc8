//! # Core Entities
//!
//! Queue identity and event identifiers.

use crate::errors::{ParseEventIdError, QueueKeyError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Maximum length in bytes of a queue name or access key.
pub const MAX_KEY_COMPONENT_LEN: usize = 256;

/// Identifier of one event inside one queue.
///
/// The value is the event's score: nanoseconds since the Unix epoch as read
/// by the producer. Serialized as a decimal string so that JSON consumers with
/// 53-bit numbers keep full precision; bare integers are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub u64);

impl EventId {
    /// Raw score.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for EventId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = ParseEventIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(EventId)
            .map_err(|_| ParseEventIdError(s.to_string()))
    }
}

impl Serialize for EventId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(EventId(n)),
            Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Composite identity of a queue: `(name, access key)`.
///
/// Both parts are opaque caller-supplied strings. The pair maps 1:1 to one
/// ordered collection in the backing store.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QueueKey {
    name: String,
    access_key: String,
}

impl QueueKey {
    /// Validate and build a queue identity.
    pub fn new(
        name: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Result<Self, QueueKeyError> {
        let name = name.into();
        let access_key = access_key.into();
        validate_component("queue name", &name)?;
        validate_component("access key", &access_key)?;
        Ok(Self { name, access_key })
    }

    /// Queue name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access key.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Key of the backing sorted set.
    ///
    /// The name is length-prefixed so that `("a:b", "c")` and `("a", "b:c")`
    /// never share a collection.
    pub fn storage_key(&self) -> String {
        format!("cq:{}:{}:{}", self.name.len(), self.name, self.access_key)
    }
}

// Access keys are bearer secrets and stay out of logs.
impl fmt::Debug for QueueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueKey")
            .field("name", &self.name)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

fn validate_component(field: &'static str, value: &str) -> Result<(), QueueKeyError> {
    if value.is_empty() {
        return Err(QueueKeyError::Empty { field });
    }
    if value.len() > MAX_KEY_COMPONENT_LEN {
        return Err(QueueKeyError::TooLong {
            field,
            max: MAX_KEY_COMPONENT_LEN,
            actual: value.len(),
        });
    }
    if value.chars().any(|c| c == '/' || c.is_control()) {
        return Err(QueueKeyError::IllegalCharacter { field });
    }
    // URL path normalisation would drop or collapse these segments.
    if value == "." || value == ".." {
        return Err(QueueKeyError::DotSegment { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_serializes_as_string() {
        let json = serde_json::to_string(&EventId(1_700_000_000_123_456_789)).unwrap();
        assert_eq!(json, "\"1700000000123456789\"");
    }

    #[test]
    fn test_event_id_accepts_number_and_string() {
        let a: EventId = serde_json::from_str("42").unwrap();
        let b: EventId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<EventId>("\"x42\"").is_err());
    }

    #[test]
    fn test_queue_key_validation() {
        assert!(QueueKey::new("orders", "k1").is_ok());
        assert_eq!(
            QueueKey::new("", "k1"),
            Err(QueueKeyError::Empty { field: "queue name" })
        );
        assert!(matches!(
            QueueKey::new("a/b", "k1"),
            Err(QueueKeyError::IllegalCharacter { .. })
        ));
        assert!(matches!(
            QueueKey::new("q", "x".repeat(MAX_KEY_COMPONENT_LEN + 1)),
            Err(QueueKeyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_dot_segments_rejected() {
        for dots in [".", ".."] {
            assert_eq!(
                QueueKey::new(dots, "k1"),
                Err(QueueKeyError::DotSegment { field: "queue name" })
            );
            assert!(matches!(
                QueueKey::new("orders", dots),
                Err(QueueKeyError::DotSegment { .. })
            ));
        }
        assert!(QueueKey::new("...", "k.1").is_ok());
        assert!(QueueKey::new(".hidden", "..k").is_ok());
    }

    #[test]
    fn test_storage_key_is_unambiguous() {
        let a = QueueKey::new("a:b", "c").unwrap();
        let b = QueueKey::new("a", "b:c").unwrap();
        assert_ne!(a.storage_key(), b.storage_key());
    }

    #[test]
    fn test_debug_redacts_access_key() {
        let key = QueueKey::new("orders", "super-secret").unwrap();
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("orders"));
        assert!(!rendered.contains("super-secret"));
    }
}
