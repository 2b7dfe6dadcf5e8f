// ── Resource specs ──
//
// Everything that differs between list screens: endpoint, collection
// key in the page payload, form schema, whether writes are allowed and
// the feedback messages. One `ResourceController` implementation is
// instantiated against each spec.

use std::fmt;
use std::sync::Arc;

use crate::schema::{FieldSpec, Rule, Schema, Validator};

/// Feedback text shown after writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub created: String,
    pub updated: String,
    pub deleted: String,
    pub delete_failed: String,
    /// Banner when the backend rejects a submission without a message.
    pub save_failed: String,
}

impl Messages {
    fn for_label(label: &str) -> Self {
        Self {
            created: format!("Insert new {label} success"),
            updated: format!("Update {label} success"),
            deleted: format!("Delete {label} success"),
            delete_failed: format!("Delete {label} fail"),
            save_failed: format!("Could not save {label}"),
        }
    }
}

#[derive(Clone)]
pub struct ResourceSpec {
    endpoint: String,
    label: String,
    collection_key: String,
    schema: Arc<Schema>,
    validator: Arc<dyn Validator>,
    writable: bool,
    messages: Messages,
}

impl fmt::Debug for ResourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSpec")
            .field("endpoint", &self.endpoint)
            .field("label", &self.label)
            .field("collection_key", &self.collection_key)
            .field("writable", &self.writable)
            .finish_non_exhaustive()
    }
}

impl ResourceSpec {
    pub fn builder(endpoint: impl Into<String>) -> ResourceSpecBuilder {
        let endpoint = endpoint.into();
        ResourceSpecBuilder {
            label: endpoint.clone(),
            collection_key: endpoint.clone(),
            endpoint,
            schema: Schema::new(),
            validator: None,
            writable: true,
            messages: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn collection_key(&self) -> &str {
        &self.collection_key
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn validator(&self) -> &dyn Validator {
        self.validator.as_ref()
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub(crate) fn list_path(&self) -> String {
        format!("{}/paginate", self.endpoint)
    }

    pub(crate) fn record_path(&self, id: &str) -> String {
        format!("{}/{id}", self.endpoint)
    }

    // ── Presets for the backend's list screens ───────────────────────

    pub fn users() -> Self {
        Self::builder("users")
            .label("account")
            .field(FieldSpec::new("username", "User name").required().min_len(3).max_len(50))
            .field(
                FieldSpec::new("role", "Role")
                    .required()
                    .rule(Rule::PositiveInteger),
            )
            .field(FieldSpec::new("email", "Email").max_len(100))
            .build()
    }

    pub fn ages() -> Self {
        Self::builder("ages")
            .label("age category")
            .field(FieldSpec::new("ageId", "Age ID").required().max_len(10).create_only())
            .field(FieldSpec::new("ageName", "Age name").required().max_len(50))
            .build()
    }

    pub fn branches() -> Self {
        Self::builder("branches")
            .label("branch category")
            .field(
                FieldSpec::new("branchId", "Branch ID")
                    .required()
                    .max_len(10)
                    .create_only(),
            )
            .field(FieldSpec::new("branchName", "Branch name").required().max_len(50))
            .build()
    }

    pub fn skills() -> Self {
        Self::builder("skills")
            .label("skill category")
            .field(
                FieldSpec::new("skillId", "Skill ID")
                    .required()
                    .max_len(10)
                    .create_only(),
            )
            .field(FieldSpec::new("skillName", "Skill name").required().max_len(50))
            .build()
    }

    pub fn roles() -> Self {
        Self::builder("roles")
            .label("role")
            .field(
                FieldSpec::new("roleId", "Role ID")
                    .required()
                    .rule(Rule::PositiveInteger),
            )
            .field(FieldSpec::new("roleName", "Role name").required().max_len(50))
            .build()
    }

    /// Storefront catalog: list and detail only.
    pub fn products() -> Self {
        Self::builder("products")
            .label("product")
            .field(FieldSpec::new("productName", "Product name"))
            .field(FieldSpec::new("price", "Price").rule(Rule::NonNegativeNumber))
            .read_only()
            .build()
    }

    /// Look up a preset by endpoint name.
    pub fn preset(endpoint: &str) -> Option<Self> {
        match endpoint {
            "users" => Some(Self::users()),
            "ages" => Some(Self::ages()),
            "branches" => Some(Self::branches()),
            "skills" => Some(Self::skills()),
            "roles" => Some(Self::roles()),
            "products" => Some(Self::products()),
            _ => None,
        }
    }
}

pub struct ResourceSpecBuilder {
    endpoint: String,
    label: String,
    collection_key: String,
    schema: Schema,
    validator: Option<Arc<dyn Validator>>,
    writable: bool,
    messages: Option<Messages>,
}

impl ResourceSpecBuilder {
    /// Human name used in feedback messages.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Key holding the records in a page payload (defaults to the endpoint).
    pub fn collection_key(mut self, key: impl Into<String>) -> Self {
        self.collection_key = key.into();
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.schema = self.schema.field(field);
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Replace the schema's own rules with a custom validator.
    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn build(self) -> ResourceSpec {
        let schema = Arc::new(self.schema);
        let validator = self
            .validator
            .unwrap_or_else(|| Arc::clone(&schema) as Arc<dyn Validator>);
        let messages = self
            .messages
            .unwrap_or_else(|| Messages::for_label(&self.label));
        ResourceSpec {
            endpoint: self.endpoint,
            label: self.label,
            collection_key: self.collection_key,
            schema,
            validator,
            writable: self.writable,
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builder_defaults_follow_endpoint() {
        let spec = ResourceSpec::builder("vouchers").build();
        assert_eq!(spec.collection_key(), "vouchers");
        assert_eq!(spec.list_path(), "vouchers/paginate");
        assert_eq!(spec.record_path("v1"), "vouchers/v1");
        assert!(spec.is_writable());
        assert_eq!(spec.messages().created, "Insert new vouchers success");
    }

    #[test]
    fn presets_cover_every_list_screen() {
        for name in ["users", "ages", "branches", "skills", "roles", "products"] {
            let spec = ResourceSpec::preset(name);
            assert!(spec.is_some(), "missing preset {name}");
        }
        assert!(ResourceSpec::preset("carts").is_none());
        assert!(!ResourceSpec::products().is_writable());
    }

    #[test]
    fn category_ids_are_create_only() {
        let spec = ResourceSpec::ages();
        let editable: Vec<_> = spec.schema().editable().map(FieldSpec::name).collect();
        assert_eq!(editable, vec!["ageName"]);
        assert_eq!(spec.messages().updated, "Update age category success");
    }
}
