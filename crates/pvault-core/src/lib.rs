//! pvault-core: shared types, config schema, and error types for PocketVault

pub mod config;
pub mod error;
pub mod types;

pub use error::{VaultError, VaultResult};
pub use types::{FieldValue, Record};
