// Read-through access to meeting snapshots and increment lists.
//
// - Snapshots served from the cache are only used for reads, never for state
//   machine decisions.
// - Cache failures are logged and the ledger is read instead.
// - Invalidation uses the same key functions as the reads.
// - A read that raced an invalidation never leaves its snapshot behind: every
//   invalidation bumps a generation, and a write-back made under an older
//   generation is taken back out.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use uuid::Uuid;

use crate::modules::meetings::adapters::outbound::ledger::{LedgerError, LedgerStore};
use crate::modules::meetings::core::keys::{increments_key, keys_touched_by_mutation, meeting_key};
use crate::modules::meetings::core::meeting::{Increment, Meeting};
use crate::shared::core::primitives::round_money;
use crate::shared::infrastructure::cache::{Cache, get_json, set_json};

pub struct MeetingReader {
    ledger: Arc<dyn LedgerStore>,
    cache: Arc<dyn Cache>,
    meeting_ttl: Duration,
    increments_ttl: Duration,
    generation: AtomicU64,
}

impl MeetingReader {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        cache: Arc<dyn Cache>,
        meeting_ttl: Duration,
        increments_ttl: Duration,
    ) -> Self {
        Self {
            ledger,
            cache,
            meeting_ttl,
            increments_ttl,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn meeting(&self, meeting_id: Uuid) -> Result<Meeting, LedgerError> {
        let key = meeting_key(meeting_id);
        if let Some(meeting) = self.cached::<Meeting>(&key).await {
            return Ok(meeting);
        }
        let generation = self.generation();
        let meeting = self.ledger.get_meeting(meeting_id).await?;
        self.store(generation, &key, &meeting, self.meeting_ttl).await;
        Ok(meeting)
    }

    /// Meeting and increment list that belong to the same committed state.
    pub async fn meeting_with_increments(
        &self,
        meeting_id: Uuid,
    ) -> Result<(Meeting, Vec<Increment>), LedgerError> {
        let meeting = self.cached::<Meeting>(&meeting_key(meeting_id)).await;
        let increments = self.cached::<Vec<Increment>>(&increments_key(meeting_id)).await;
        if let (Some(meeting), Some(increments)) = (meeting, increments) {
            if is_coherent(&meeting, &increments) {
                return Ok((meeting, increments));
            }
            tracing::debug!(%meeting_id, "cached meeting and increments disagree, reading ledger");
        }

        let generation = self.generation();
        let (meeting, increments) = self.ledger.get_meeting_with_increments(meeting_id).await?;
        self.store(generation, &meeting_key(meeting_id), &meeting, self.meeting_ttl)
            .await;
        self.store(generation, &increments_key(meeting_id), &increments, self.increments_ttl)
            .await;
        Ok((meeting, increments))
    }

    pub async fn invalidate(&self, meeting_id: Uuid) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let keys = keys_touched_by_mutation(meeting_id);
        if let Err(error) = self.cache.delete(&keys).await {
            tracing::warn!(%meeting_id, %error, "cache invalidation failed");
        }
    }

    async fn cached<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match get_json::<T>(self.cache.as_ref(), key).await {
            Ok(Some(value)) => {
                tracing::debug!(%key, "cache hit");
                Some(value)
            }
            Ok(None) => {
                tracing::debug!(%key, "cache miss");
                None
            }
            Err(error) => {
                tracing::warn!(%key, %error, "cache read failed");
                None
            }
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// `generation` is the one observed before the ledger read that produced `value`.
    async fn store<T: serde::Serialize + Sync>(
        &self,
        generation: u64,
        key: &str,
        value: &T,
        ttl: Duration,
    ) {
        if let Err(error) = set_json(self.cache.as_ref(), key, value, ttl).await {
            tracing::warn!(%key, %error, "cache write failed");
            return;
        }
        if self.generation() != generation {
            tracing::debug!(%key, "invalidated while reading, dropping snapshot");
            if let Err(error) = self.cache.delete(&[key.to_string()]).await {
                tracing::warn!(%key, %error, "cache invalidation failed");
            }
        }
    }
}

/// Detects snapshots cached from different commits.
fn is_coherent(meeting: &Meeting, increments: &[Increment]) -> bool {
    if increments.iter().any(|i| i.meeting_id != meeting.id) {
        return false;
    }
    let open = increments.iter().filter(|i| i.is_open()).count();
    if open != usize::from(meeting.is_active) {
        return false;
    }
    let closed_total = round_money(
        increments
            .iter()
            .filter(|i| !i.is_open())
            .map(|i| i.cost)
            .sum(),
    );
    closed_total == meeting.total_cost_cached
}
