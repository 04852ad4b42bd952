// In memory audit sink. Collects entries for inspection in tests.

use crate::shared::infrastructure::audit::{AuditEntry, AuditError, AuditSink};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
    is_offline: AtomicBool,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().await.clone()
    }

    /// Entries are written from detached tasks; give them a chance to land.
    pub async fn settled_entries(&self, expected: usize) -> Vec<AuditEntry> {
        for _ in 0..100 {
            if self.entries.lock().await.len() >= expected {
                break;
            }
            tokio::task::yield_now().await;
        }
        self.entries().await
    }
}

#[async_trait::async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn log(&self, entry: AuditEntry) -> Result<(), AuditError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(AuditError::Unavailable("Audit sink offline".into()));
        }
        self.entries.lock().await.push(entry);
        Ok(())
    }
}
