// User accounts and the roles they are assigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default)]
    pub username: String,
    /// Numeric `roleId` of the assigned role.
    #[serde(default)]
    pub role: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub role_id: u32,
    pub role_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for User {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "username" => Some(self.username.clone()),
            "role" => self.role.map(|r| r.to_string()),
            "email" => self.email.clone(),
            _ => None,
        }
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Resource for Role {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "roleId" => Some(self.role_id.to_string()),
            "roleName" => Some(self.role_name.clone()),
            _ => None,
        }
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn role_id_renders_as_text() {
        let role: Role = serde_json::from_value(json!({
            "_id": "r1",
            "roleId": 3,
            "roleName": "Manager",
            "createdAt": "2024-02-01T00:00:00Z",
            "updatedAt": "2024-02-01T00:00:00Z",
            "__v": 0
        }))
        .unwrap();
        assert_eq!(role.field("roleId").as_deref(), Some("3"));
    }

    #[test]
    fn user_without_role_or_email() {
        let user: User = serde_json::from_value(json!({ "_id": "u1", "username": "mai" })).unwrap();
        assert_eq!(user.field("username").as_deref(), Some("mai"));
        assert_eq!(user.field("role"), None);
        assert_eq!(user.field("email"), None);
    }
}
