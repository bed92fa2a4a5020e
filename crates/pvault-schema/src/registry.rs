//! Category registry: built-ins merged with user-defined categories.
//!
//! The registry is an explicit value injected into the record store at
//! construction; nothing in the core reads it from ambient global state.
//! User-defined categories persist as an append-only JSON list, loaded at
//! startup and merged with the built-ins.

use std::collections::BTreeSet;
use std::path::Path;

use pvault_core::{VaultError, VaultResult};

use crate::builtin;
use crate::types::CategorySchema;
use crate::validate::validate_schema;

#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    builtin: Vec<CategorySchema>,
    custom: Vec<CategorySchema>,
}

impl CategoryRegistry {
    /// Registry with the built-in categories only.
    pub fn with_builtins() -> Self {
        CategoryRegistry {
            builtin: builtin::all(),
            custom: Vec::new(),
        }
    }

    /// Completely empty registry. Useful in tests.
    pub fn empty() -> Self {
        CategoryRegistry {
            builtin: Vec::new(),
            custom: Vec::new(),
        }
    }

    /// Built-ins plus the user-defined categories stored at `path`.
    /// A missing file yields just the built-ins.
    pub fn load(path: &Path) -> VaultResult<Self> {
        let mut registry = Self::with_builtins();
        if !path.exists() {
            return Ok(registry);
        }
        let content = std::fs::read_to_string(path)?;
        let custom: Vec<CategorySchema> = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parsing category registry {}: {e}", path.display()))?;
        for schema in custom {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// Persist the user-defined categories (built-ins are code, not data).
    /// Written atomically via temp file + rename.
    pub fn save(&self, path: &Path) -> VaultResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.custom)
            .map_err(|e| anyhow::anyhow!("serializing category registry: {e}"))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn resolve(&self, id: &str) -> Option<&CategorySchema> {
        self.all().find(|c| c.id == id)
    }

    /// Register a user-defined category.
    ///
    /// Fails with `DuplicateId` if the id collides with a built-in or an
    /// existing custom category, and with `Validation` if the definition
    /// itself is malformed.
    pub fn register(&mut self, schema: CategorySchema) -> VaultResult<()> {
        validate_schema(&schema)?;
        if self.resolve(&schema.id).is_some() {
            return Err(VaultError::DuplicateId(schema.id));
        }
        tracing::debug!(id = %schema.id, "registered custom category");
        self.custom.push(schema);
        Ok(())
    }

    /// Remove a user-defined category. Built-ins cannot be removed.
    pub fn remove_custom(&mut self, id: &str) -> VaultResult<CategorySchema> {
        if self.builtin.iter().any(|c| c.id == id) {
            return Err(VaultError::Validation(format!(
                "built-in category {id:?} cannot be removed"
            )));
        }
        match self.custom.iter().position(|c| c.id == id) {
            Some(index) => Ok(self.custom.remove(index)),
            None => Err(VaultError::NotFound(format!("category {id:?}"))),
        }
    }

    /// Sensitive field names for a category, or `None` if the category is
    /// unknown.
    pub fn sensitive_field_names(&self, id: &str) -> Option<BTreeSet<String>> {
        self.resolve(id).map(CategorySchema::sensitive_field_names)
    }

    /// All categories, built-ins first, then customs in registration order.
    pub fn all(&self) -> impl Iterator<Item = &CategorySchema> {
        self.builtin.iter().chain(self.custom.iter())
    }

    pub fn custom(&self) -> &[CategorySchema] {
        &self.custom
    }
}
