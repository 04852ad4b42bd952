// Audit sink port: fire-and-forget record of who did what to which resource.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub actor_id: Option<Uuid>,
    pub org_id: Option<Uuid>,
    pub action: String,
    pub resource_kind: String,
    pub resource_id: Uuid,
    pub details: Option<serde_json::Value>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn log(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

/// Hands the entry to the sink on a detached task. Failures are logged only.
pub fn dispatch(sink: Arc<dyn AuditSink>, entry: AuditEntry) {
    tokio::spawn(async move {
        let action = entry.action.clone();
        let resource_id = entry.resource_id;
        if let Err(error) = sink.log(entry).await {
            tracing::warn!(%action, %resource_id, %error, "audit log failed");
        }
    });
}

pub mod in_memory;
pub mod tracing_sink;
