//! Shape validation for category definitions and incoming records.

use pvault_core::{FieldValue, Record, VaultError, VaultResult};

use crate::types::{CategorySchema, FieldType};

/// Validate a category definition before it enters the registry.
pub fn validate_schema(schema: &CategorySchema) -> VaultResult<()> {
    if schema.id.is_empty() {
        return Err(VaultError::Validation("category id must not be empty".into()));
    }
    if !schema
        .id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(VaultError::Validation(format!(
            "category id {:?} may only contain lowercase letters, digits, '_' and '-'",
            schema.id
        )));
    }
    if schema.label.is_empty() {
        return Err(VaultError::Validation(format!(
            "category {:?} must have a label",
            schema.id
        )));
    }
    if schema.fields.is_empty() {
        return Err(VaultError::Validation(format!(
            "category {:?} must define at least one field",
            schema.id
        )));
    }

    let mut seen = std::collections::BTreeSet::new();
    for field in &schema.fields {
        if field.name.is_empty() {
            return Err(VaultError::Validation(format!(
                "category {:?} has a field with an empty name",
                schema.id
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(VaultError::Validation(format!(
                "category {:?} defines field {:?} twice",
                schema.id, field.name
            )));
        }
        if field.sensitive && !field.value_type.is_text_kind() {
            return Err(VaultError::Validation(format!(
                "sensitive field {:?} must be text-kind, not {:?}",
                field.name, field.value_type
            )));
        }
    }
    Ok(())
}

/// Validate a plaintext record against its category schema.
///
/// Runs at the store boundary, before any encryption: unknown fields are
/// rejected, required fields must be present and non-empty, and each value's
/// variant must match the declared field type.
pub fn validate_record(schema: &CategorySchema, record: &Record) -> VaultResult<()> {
    for (name, value) in &record.fields {
        let Some(spec) = schema.field(name) else {
            return Err(VaultError::Validation(format!(
                "field {:?} is not defined for category {:?}",
                name, schema.id
            )));
        };

        let matches = match spec.value_type {
            FieldType::Text | FieldType::Password | FieldType::LongText => {
                matches!(value, FieldValue::Text(_))
            }
            FieldType::Date => matches!(value, FieldValue::Date(_)),
        };
        if !matches {
            return Err(VaultError::Validation(format!(
                "field {:?} does not match its declared type {:?}",
                name, spec.value_type
            )));
        }
    }

    for spec in &schema.fields {
        if spec.required {
            match record.fields.get(&spec.name) {
                Some(value) if !value.is_empty() => {}
                _ => {
                    return Err(VaultError::Validation(format!(
                        "required field {:?} is missing or empty",
                        spec.name
                    )));
                }
            }
        }
    }
    Ok(())
}
