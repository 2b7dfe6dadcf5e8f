// ── Resource abstraction ──
//
// The controller is generic over any record that can name its id and
// render a named field as text. Typed entities implement it by hand;
// `Record` covers endpoints without a dedicated type.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;

/// A server-side record manageable by a `ResourceController`.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> &EntityId;

    /// Text form of a field by its wire name, `None` when absent.
    fn field(&self, name: &str) -> Option<String>;

    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Schemaless record: id, timestamps and every other field as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "_id", alias = "id")]
    pub id: EntityId,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Resource for Record {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).and_then(value_text)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Render a JSON value the way a form field shows it.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn record_keeps_domain_fields() {
        let record: Record = serde_json::from_value(json!({
            "_id": "65a0c2f1e4b0a1b2c3d4e5f6",
            "roleId": 2,
            "roleName": "Staff",
            "createdAt": "2024-01-12T08:30:00.000Z",
            "__v": 0
        }))
        .unwrap();

        assert_eq!(record.id().to_string(), "65a0c2f1e4b0a1b2c3d4e5f6");
        assert_eq!(record.field("roleId").as_deref(), Some("2"));
        assert_eq!(record.field("roleName").as_deref(), Some("Staff"));
        assert!(record.created_at().is_some());
        assert_eq!(record.field("missing"), None);
    }
}
