// ── Dialog lifecycle ──
//
// State of the add/edit modal attached to a list screen: open flag,
// mode, raw values, per-field errors, touched fields and the banner
// shown when the backend rejects a submission. The controller drives
// the transitions; this module holds the per-field bookkeeping.

use indexmap::IndexSet;

use crate::model::Resource;
use crate::schema::{FieldErrors, FormValues, Schema, Validator};

/// Banner shown when an edit submission changes nothing.
pub const NO_CHANGES_MESSAGE: &str = "There must be at least one data change";

#[derive(Debug, Clone, PartialEq)]
pub enum DialogMode<R> {
    Create,
    /// Editing the record as it was loaded.
    Edit(R),
}

#[derive(Debug, Clone)]
pub struct DialogState<R> {
    pub open: bool,
    pub mode: DialogMode<R>,
    pub values: FormValues,
    pub errors: FieldErrors,
    pub touched: IndexSet<String>,
    pub submit_error: Option<String>,
}

impl<R> Default for DialogState<R> {
    fn default() -> Self {
        Self {
            open: false,
            mode: DialogMode::Create,
            values: FormValues::new(),
            errors: FieldErrors::new(),
            touched: IndexSet::new(),
            submit_error: None,
        }
    }
}

impl<R: Resource> DialogState<R> {
    pub fn closed() -> Self {
        Self::default()
    }

    /// Open a blank create form seeded with schema defaults.
    pub fn for_create(schema: &Schema) -> Self {
        Self {
            open: true,
            values: schema.defaults(),
            ..Self::default()
        }
    }

    /// Open an edit form pre-populated from the record's editable fields.
    pub fn for_edit(schema: &Schema, record: R) -> Self {
        let values = schema
            .editable()
            .map(|f| (f.name().to_owned(), record.field(f.name()).unwrap_or_default()))
            .collect();
        Self {
            open: true,
            mode: DialogMode::Edit(record),
            values,
            ..Self::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, DialogMode::Edit(_))
    }

    pub fn original(&self) -> Option<&R> {
        match &self.mode {
            DialogMode::Edit(record) => Some(record),
            DialogMode::Create => None,
        }
    }

    /// Change a value and re-validate that field.
    pub fn set_field(&mut self, validator: &dyn Validator, field: &str, value: String) {
        self.values.insert(field.to_owned(), value);
        self.revalidate(validator, field);
    }

    /// Mark a field touched and re-validate it.
    pub fn blur_field(&mut self, validator: &dyn Validator, field: &str) {
        self.touched.insert(field.to_owned());
        self.revalidate(validator, field);
    }

    /// Validate the whole form, touching every field. Returns `true` when valid.
    pub fn validate_all(&mut self, validator: &dyn Validator) -> bool {
        self.touched.extend(self.values.keys().cloned());
        self.errors = validator.validate(&self.values);
        self.errors.is_empty()
    }

    /// True when every edit-form value equals the loaded record's exactly.
    pub fn is_unchanged(&self) -> bool {
        let DialogMode::Edit(original) = &self.mode else {
            return false;
        };
        self.values
            .iter()
            .all(|(name, value)| original.field(name).unwrap_or_default() == *value)
    }

    /// Error for a field, only once the field has been touched.
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if self.touched.contains(field) {
            self.errors.get(field).map(String::as_str)
        } else {
            None
        }
    }

    fn revalidate(&mut self, validator: &dyn Validator, field: &str) {
        match validator.validate_field(field, &self.values) {
            Some(message) => {
                self.errors.insert(field.to_owned(), message);
            }
            None => {
                self.errors.shift_remove(field);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{AgeCategory, EntityId};
    use crate::schema::FieldSpec;

    fn schema() -> Schema {
        Schema::new()
            .field(FieldSpec::new("ageId", "Age ID").required().create_only())
            .field(FieldSpec::new("ageName", "Age name").required().max_len(30))
    }

    fn toddler() -> AgeCategory {
        AgeCategory {
            id: EntityId::from("a1"),
            age_id: "A01".into(),
            age_name: "Toddler".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn create_form_starts_clean() {
        let dialog = DialogState::<AgeCategory>::for_create(&schema());
        assert!(dialog.open);
        assert!(!dialog.is_editing());
        assert_eq!(dialog.values.len(), 2);
        assert!(dialog.errors.is_empty());
        assert!(dialog.submit_error.is_none());
    }

    #[test]
    fn edit_form_holds_only_editable_fields() {
        let dialog = DialogState::for_edit(&schema(), toddler());
        assert_eq!(dialog.values.keys().collect::<Vec<_>>(), vec!["ageName"]);
        assert_eq!(dialog.values["ageName"], "Toddler");
        assert!(dialog.is_unchanged());
    }

    #[test]
    fn error_visible_only_after_touch() {
        let schema = schema();
        let mut dialog = DialogState::<AgeCategory>::for_create(&schema);
        dialog.set_field(&schema, "ageName", String::new());
        assert_eq!(dialog.errors["ageName"], "Age name is required");
        assert_eq!(dialog.visible_error("ageName"), None);

        dialog.blur_field(&schema, "ageName");
        assert_eq!(dialog.visible_error("ageName"), Some("Age name is required"));

        dialog.set_field(&schema, "ageName", "Teen".into());
        assert_eq!(dialog.visible_error("ageName"), None);
    }

    #[test]
    fn validate_all_touches_everything() {
        let schema = schema();
        let mut dialog = DialogState::<AgeCategory>::for_create(&schema);
        assert!(!dialog.validate_all(&schema));
        assert_eq!(dialog.touched.len(), 2);
        assert_eq!(dialog.errors.len(), 2);
    }

    #[test]
    fn trailing_whitespace_counts_as_a_change() {
        let schema = schema();
        let mut dialog = DialogState::for_edit(&schema, toddler());
        dialog.set_field(&schema, "ageName", "Toddler ".into());
        assert!(!dialog.is_unchanged());
        dialog.set_field(&schema, "ageName", "Toddler".into());
        assert!(dialog.is_unchanged());
    }
}
