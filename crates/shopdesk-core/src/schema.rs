// ── Validation engine ──
//
// A `Schema` lists a form's fields with their rules. Validation maps
// form values (field -> raw text) to per-field messages; an empty
// result means the form is valid. Rules other than `Required` skip
// empty values.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// Raw form input keyed by wire field name, in display order.
pub type FormValues = IndexMap<String, String>;

/// Per-field validation messages. Empty means valid.
pub type FieldErrors = IndexMap<String, String>;

/// Anything that can judge a set of form values.
pub trait Validator: Send + Sync {
    fn validate(&self, values: &FormValues) -> FieldErrors;

    /// Validate one field in the context of the whole form.
    fn validate_field(&self, field: &str, values: &FormValues) -> Option<String> {
        self.validate(values).shift_remove(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Integer,
    PositiveInteger,
    Number,
    NonNegativeNumber,
}

impl Rule {
    fn check(self, label: &str, value: &str) -> Option<String> {
        let ok = match self {
            Self::Required => !value.is_empty(),
            _ if value.is_empty() => true,
            Self::MinLength(min) => value.chars().count() >= min,
            Self::MaxLength(max) => value.chars().count() <= max,
            Self::Integer => value.parse::<i64>().is_ok(),
            Self::PositiveInteger => value.parse::<u64>().is_ok_and(|n| n > 0),
            Self::Number => value.parse::<f64>().is_ok_and(f64::is_finite),
            Self::NonNegativeNumber => value
                .parse::<f64>()
                .is_ok_and(|n| n.is_finite() && n >= 0.0),
        };
        if ok {
            return None;
        }
        Some(match self {
            Self::Required => format!("{label} is required"),
            Self::MinLength(min) => format!("{label} must be at least {min} characters"),
            Self::MaxLength(max) => format!("{label} must be at most {max} characters"),
            Self::Integer => format!("{label} must be an integer"),
            Self::PositiveInteger => format!("{label} must be a positive integer"),
            Self::Number => format!("{label} must be a number"),
            Self::NonNegativeNumber => format!("{label} must be a number of at least 0"),
        })
    }
}

/// One form field: wire name, display label, rules and default value.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    label: String,
    rules: Vec<Rule>,
    default: String,
    create_only: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            rules: Vec::new(),
            default: String::new(),
            create_only: false,
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    pub fn max_len(self, max: usize) -> Self {
        self.rule(Rule::MaxLength(max))
    }

    pub fn min_len(self, min: usize) -> Self {
        self.rule(Rule::MinLength(min))
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = value.into();
        self
    }

    /// Set once at creation; absent from the edit form.
    pub fn create_only(mut self) -> Self {
        self.create_only = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn initial_value(&self) -> &str {
        &self.default
    }

    pub fn is_create_only(&self) -> bool {
        self.create_only
    }

    /// First failing rule's message for a raw value.
    pub fn check(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        self.rules.iter().find_map(|rule| rule.check(&self.label, value))
    }

    /// Encode a raw value for the request body; numeric fields become
    /// JSON numbers, everything else a trimmed string.
    fn encode(&self, raw: &str) -> Option<Value> {
        let value = raw.trim();
        let integer = self
            .rules
            .iter()
            .any(|r| matches!(r, Rule::Integer | Rule::PositiveInteger));
        let number = self
            .rules
            .iter()
            .any(|r| matches!(r, Rule::Number | Rule::NonNegativeNumber));

        if integer || number {
            if value.is_empty() {
                return None;
            }
            if let Ok(n) = value.parse::<i64>() {
                return Some(Value::Number(n.into()));
            }
            return value
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number);
        }
        Some(Value::String(value.to_owned()))
    }
}

/// An ordered set of form fields.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields present in the edit form.
    pub fn editable(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| !f.create_only)
    }

    /// Values a freshly opened create form starts with.
    pub fn defaults(&self) -> FormValues {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect()
    }

    /// Request body for a submission: known fields only, trimmed.
    pub fn payload(&self, values: &FormValues) -> Map<String, Value> {
        self.fields
            .iter()
            .filter_map(|f| {
                let raw = values.get(&f.name)?;
                f.encode(raw).map(|v| (f.name.clone(), v))
            })
            .collect()
    }
}

impl Validator for Schema {
    fn validate(&self, values: &FormValues) -> FieldErrors {
        self.fields
            .iter()
            // Create-only fields are not part of an edit form.
            .filter(|f| !f.create_only || values.contains_key(&f.name))
            .filter_map(|f| {
                let raw = values.get(&f.name).map_or("", String::as_str);
                f.check(raw).map(|msg| (f.name.clone(), msg))
            })
            .collect()
    }

    fn validate_field(&self, field: &str, values: &FormValues) -> Option<String> {
        let spec = self.get(field)?;
        spec.check(values.get(field).map_or("", String::as_str))
    }
}
