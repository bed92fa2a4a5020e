use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Value type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Password,
    Date,
    LongText,
}

impl FieldType {
    /// Whether values of this type are strings. Only text-kind fields may
    /// be marked sensitive, since the field cipher operates on strings.
    pub fn is_text_kind(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::Password | FieldType::LongText)
    }
}

/// One field of a category.
///
/// Immutable once the category is defined: renaming a field breaks records
/// written under the old name (documented limitation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub value_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub sensitive: bool,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        value_type: FieldType,
    ) -> Self {
        FieldSpec {
            name: name.into(),
            label: label.into(),
            value_type,
            required: false,
            sensitive: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// A record category: id, human label, and ordered field list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySchema {
    pub id: String,
    pub label: String,
    pub fields: Vec<FieldSpec>,
}

impl CategorySchema {
    pub fn new(id: impl Into<String>, label: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        CategorySchema {
            id: id.into(),
            label: label.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the fields marked sensitive. Derived, not stored.
    pub fn sensitive_field_names(&self) -> BTreeSet<String> {
        self.fields
            .iter()
            .filter(|f| f.sensitive)
            .map(|f| f.name.clone())
            .collect()
    }
}
