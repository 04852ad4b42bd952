// Audit sink that writes entries to the `audit` tracing target.

use crate::shared::infrastructure::audit::{AuditEntry, AuditError, AuditSink};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

#[async_trait::async_trait]
impl AuditSink for TracingAuditSink {
    async fn log(&self, entry: AuditEntry) -> Result<(), AuditError> {
        tracing::info!(
            target: "audit",
            action = %entry.action,
            resource_kind = %entry.resource_kind,
            resource_id = %entry.resource_id,
            actor_id = ?entry.actor_id,
            org_id = ?entry.org_id,
            ip = ?entry.ip,
            user_agent = ?entry.user_agent,
            details = ?entry.details,
            at = %entry.at,
        );
        Ok(())
    }
}
