//! pvault-store: record-store orchestration for PocketVault
//!
//! The store owns no record state of its own: every record lives in the
//! injected [`RecordBackend`] (the persistence collaborator), sealed. The
//! store's job is the orchestration around it: schema resolution and
//! validation, duplicate detection, selective sealing/opening via the
//! codec, and a best-effort audit trail.

pub mod audit;
pub mod backend;
pub mod filter;
pub mod json_file;
pub mod memory;
pub mod store;

pub use audit::{AuditAction, AuditEvent, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use backend::RecordBackend;
pub use filter::{vault_stats, RecordFilter, VaultStats};
pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use store::RecordStore;
