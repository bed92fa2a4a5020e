use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A dynamically-typed field value.
///
/// Serialized untagged, so a record at rest is a plain string-keyed map of
/// primitives. Variant order matters for deserialization: booleans and ISO
/// dates are tried before falling back to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Canonical string rendering, used for search, duplicate comparison,
    /// and display.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }

    /// An empty text value is the "field not set" sentinel; dates and
    /// booleans always count as set.
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// One vault record.
///
/// A record held in memory by the application is always plaintext; a record
/// handed to the persistence collaborator has its sensitive fields replaced
/// by serialized envelopes. The shape is identical in both states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Assigned by the persistence collaborator on insert; empty until then.
    #[serde(default)]
    pub id: String,
    /// References a `CategorySchema` id.
    pub category: String,
    /// Field name → value, per the category's field list.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Set by the persistence collaborator on insert.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Refreshed by the persistence collaborator on every write.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn new(category: impl Into<String>) -> Self {
        Record {
            id: String::new(),
            category: category.into(),
            fields: BTreeMap::new(),
            tags: BTreeSet::new(),
            is_favorite: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Text content of a field, if present and text-typed.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Rendered value of a field if it is present and non-empty.
    pub fn rendered(&self, name: &str) -> Option<String> {
        match self.fields.get(name) {
            Some(v) if !v.is_empty() => Some(v.render()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_untagged_serde() {
        let text: FieldValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, FieldValue::text("hello"));

        let boolean: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(boolean, FieldValue::Bool(true));

        let date: FieldValue = serde_json::from_str("\"2026-03-14\"").unwrap();
        assert_eq!(
            date,
            FieldValue::Date(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
        );
    }

    #[test]
    fn test_record_json_shape() {
        let record = Record::new("passwords")
            .with_field("serviceName", "example")
            .with_field("password", "hunter2")
            .with_tag("work");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["category"], "passwords");
        assert_eq!(json["fields"]["password"], "hunter2");
        assert_eq!(json["tags"][0], "work");
        assert_eq!(json["is_favorite"], false);

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_empty_text_is_unset() {
        assert!(FieldValue::text("").is_empty());
        assert!(!FieldValue::text("x").is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
    }

    #[test]
    fn test_rendered_skips_empty() {
        let record = Record::new("notes")
            .with_field("title", "groceries")
            .with_field("content", "");
        assert_eq!(record.rendered("title").as_deref(), Some("groceries"));
        assert_eq!(record.rendered("content"), None);
        assert_eq!(record.rendered("missing"), None);
    }
}
