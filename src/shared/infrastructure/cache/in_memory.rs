// In memory implementation of the Cache port.
//
// Purpose
// - Serve tests and single-process deployments without an external cache.
//
// Responsibilities
// - Expire entries lazily against the injected Clock.
// - Simulate an outage via toggle_offline.

use crate::shared::core::clock::Clock;
use crate::shared::infrastructure::cache::{Cache, CacheError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

struct Entry {
    value: Vec<u8>,
    expires_at: DateTime<Utc>,
}

pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    is_offline: AtomicBool,
}

impl InMemoryCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            is_offline: AtomicBool::new(false),
        }
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub async fn contains(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.entries
            .read()
            .await
            .get(key)
            .is_some_and(|entry| entry.expires_at > now)
    }

    fn ensure_online(&self) -> Result<(), CacheError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("Cache offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.ensure_online()?;
        let now = self.clock.now();
        {
            let guard = self.entries.read().await;
            match guard.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        self.entries.write().await.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.ensure_online()?;
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CacheError::Unavailable(format!("invalid ttl: {e}")))?;
        let expires_at = self.clock.now() + ttl;
        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        self.ensure_online()?;
        let mut guard = self.entries.write().await;
        for key in keys {
            guard.remove(key);
        }
        Ok(())
    }
}
