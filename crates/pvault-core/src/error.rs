use thiserror::Error;

pub type VaultResult<T> = Result<T, VaultError>;

/// Closed error taxonomy for the vault core. Callers branch on the variant,
/// never on message text.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Malformed envelope (wrong segment count). Indicates corrupted storage.
    #[error("malformed envelope: {0}")]
    Format(String),

    /// MAC mismatch: tampering, wrong key, or corruption. Deliberately
    /// carries no detail about which part of the envelope failed.
    #[error("integrity check failed")]
    Integrity,

    /// Record references a category the registry does not know.
    #[error("unknown category: {0}")]
    Schema(String),

    /// Record or category definition does not match its schema.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Identity collision on create; the write was rejected.
    #[error("duplicate record: {0}")]
    DuplicateRecord(String),

    /// Category registration collided with an existing id.
    #[error("duplicate category id: {0}")]
    DuplicateId(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
