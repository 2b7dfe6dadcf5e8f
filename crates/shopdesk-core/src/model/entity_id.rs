// ── Record identity ──
//
// Every backend record carries an `_id`: a 24-hex-digit MongoDB ObjectId
// whose first four bytes are the creation time in Unix seconds. Ids typed
// on the command line may be anything, so non-ObjectId strings are kept
// verbatim and passed through to the backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const OBJECT_ID_LEN: usize = 24;

/// Identifier of a backend record (`_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityId {
    /// Well-formed ObjectId, stored lowercase.
    Object(String),
    /// Anything else the caller supplied.
    Opaque(String),
}

impl EntityId {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Object(s) | Self::Opaque(s) => s,
        }
    }

    pub fn is_object_id(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Creation time encoded in an ObjectId's leading timestamp.
    pub fn embedded_timestamp(&self) -> Option<DateTime<Utc>> {
        let Self::Object(hex) = self else {
            return None;
        };
        let seconds = i64::from_str_radix(hex.get(..8)?, 16).ok()?;
        DateTime::from_timestamp(seconds, 0)
    }
}

fn is_object_id(s: &str) -> bool {
    s.len() == OBJECT_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        if is_object_id(&s) {
            Self::Object(s.to_ascii_lowercase())
        } else {
            Self::Opaque(s)
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        match id {
            EntityId::Object(s) | EntityId::Opaque(s) => s,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn object_id_carries_creation_time() {
        let id = EntityId::from("65A0C2F1E4B0A1B2C3D4E5F6");
        assert!(id.is_object_id());
        assert_eq!(id.as_str(), "65a0c2f1e4b0a1b2c3d4e5f6");
        assert_eq!(
            id.embedded_timestamp().unwrap().to_rfc3339(),
            "2024-01-12T04:41:21+00:00"
        );
    }

    #[test]
    fn short_ids_are_opaque() {
        let id: EntityId = "r1".parse().unwrap();
        assert!(!id.is_object_id());
        assert_eq!(id.embedded_timestamp(), None);
        assert_eq!(id.to_string(), "r1");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id: EntityId = serde_json::from_str("\"507f1f77bcf86cd799439011\"").unwrap();
        assert!(id.is_object_id());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"507f1f77bcf86cd799439011\"");
    }
}
