// Catalog categories: age groups, branches and skills. Each has a
// short code fixed at creation and a display name that can be edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeCategory {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub age_id: String,
    pub age_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchCategory {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub branch_id: String,
    pub branch_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub skill_id: String,
    pub skill_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for AgeCategory {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "ageId" => Some(self.age_id.clone()),
            "ageName" => Some(self.age_name.clone()),
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

impl Resource for BranchCategory {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "branchId" => Some(self.branch_id.clone()),
            "branchName" => Some(self.branch_name.clone()),
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

impl Resource for SkillCategory {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "skillId" => Some(self.skill_id.clone()),
            "skillName" => Some(self.skill_name.clone()),
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
    fn age_category_from_wire() {
        let age: AgeCategory = serde_json::from_value(json!({
            "_id": "a1",
            "ageId": "A01",
            "ageName": "Toddler",
            "createdAt": "2024-01-12T08:30:00.000Z",
            "updatedAt": "2024-01-12T08:30:00.000Z",
            "__v": 0
        }))
        .unwrap();
        assert_eq!(age.field("ageName").as_deref(), Some("Toddler"));
        assert_eq!(age.field("branchName"), None);
    }
}
