//! Best-effort audit trail.
//!
//! Sinks are fire-and-forget: recording an event must never fail the vault
//! operation it accompanies, so the trait is infallible and implementations
//! swallow their own errors (logging them at warn).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    Logout,
    CreateItem,
    UpdateItem,
    DeleteItem,
    ViewItem,
    ExportData,
    ImportData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub scope: String,
    pub action: AuditAction,
    pub record_id: Option<String>,
    pub at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(scope: &str, action: AuditAction, record_id: Option<&str>) -> Self {
        AuditEvent {
            scope: scope.to_string(),
            action,
            record_id: record_id.map(String::from),
            at: Utc::now(),
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Default sink: structured log lines via `tracing`.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        tracing::info!(
            target: "pvault::audit",
            scope = %event.scope,
            action = ?event.action,
            record_id = event.record_id.as_deref().unwrap_or("-"),
            "audit"
        );
    }
}

/// Collects events in memory. Used by tests.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit sink poisoned").clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.lock().expect("audit sink poisoned").push(event);
    }
}
