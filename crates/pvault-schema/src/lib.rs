//! pvault-schema: category schemas for PocketVault
//!
//! A category maps an id to an ordered list of typed fields, each annotated
//! with a sensitivity marker that drives selective encryption. Built-in
//! categories are fixed at process start; user-defined categories live in a
//! registry persisted as a JSON list and merged with the built-ins on load.

pub mod builtin;
pub mod identity;
pub mod registry;
pub mod types;
pub mod validate;

pub use identity::is_duplicate_of;
pub use registry::CategoryRegistry;
pub use types::{CategorySchema, FieldSpec, FieldType};
pub use validate::{validate_record, validate_schema};
