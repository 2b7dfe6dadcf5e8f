// Storefront products and the cart line posted when one is added.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Resource};

/// Category embedded in a product payload (`branch`, `skill`, `age`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(alias = "branchName", alias = "skillName", alias = "ageName")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub product_name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<CategoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<CategoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<CategoryRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Product {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "productName" => Some(self.product_name.clone()),
            "price" => Some(self.price.to_string()),
            "amount" => self.amount.map(|a| a.to_string()),
            "rating" => self.rating.map(|r| r.to_string()),
            "branch" => self.branch.as_ref().map(|c| c.name.clone()),
            "skill" => self.skill.as_ref().map(|c| c.name.clone()),
            "age" => self.age.as_ref().map(|c| c.name.clone()),
            "image" => self.images.first().cloned(),
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

/// Body of `POST carts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub user_id: EntityId,
    pub product_id: EntityId,
    pub price: f64,
    pub amount: u32,
}
