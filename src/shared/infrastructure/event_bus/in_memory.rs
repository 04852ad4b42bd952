// In memory implementation of the EventBus port on top of tokio broadcast channels.
//
// Responsibilities
// - One broadcast channel per topic, created on first subscription.
// - Drop a topic once its last subscriber is gone.
// - Skip over messages a lagging subscriber missed instead of failing it.

use crate::shared::infrastructure::event_bus::{BusError, BusSubscription, EventBus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

type Topics = Arc<Mutex<HashMap<String, broadcast::Sender<String>>>>;

pub struct InMemoryEventBus {
    topics: Topics,
    capacity: usize,
    is_offline: AtomicBool,
}

impl InMemoryEventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
            is_offline: AtomicBool::new(false),
        }
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        lock(&self.topics)
            .get(topic)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    fn ensure_online(&self) -> Result<(), BusError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(BusError::Unavailable("Event bus offline".into()));
        }
        Ok(())
    }
}

fn lock(topics: &Topics) -> std::sync::MutexGuard<'_, HashMap<String, broadcast::Sender<String>>> {
    topics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, topic: &str, message: String) -> Result<usize, BusError> {
        self.ensure_online()?;
        let mut topics = lock(&self.topics);
        let Some(sender) = topics.get(topic) else {
            return Ok(0);
        };
        match sender.send(message) {
            Ok(delivered) => Ok(delivered),
            Err(_) => {
                topics.remove(topic);
                Ok(0)
            }
        }
    }

    async fn subscribe(&self, topic: &str) -> Result<Box<dyn BusSubscription>, BusError> {
        self.ensure_online()?;
        let receiver = lock(&self.topics)
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();
        Ok(Box::new(InMemorySubscription {
            topic: topic.to_string(),
            receiver,
            topics: self.topics.clone(),
        }))
    }
}

pub struct InMemorySubscription {
    topic: String,
    receiver: broadcast::Receiver<String>,
    topics: Topics,
}

#[async_trait::async_trait]
impl BusSubscription for InMemorySubscription {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn recv(&mut self) -> Result<Option<String>, BusError> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Ok(Some(message)),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(topic = %self.topic, missed, "subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return Ok(None),
            }
        }
    }

    async fn close(self: Box<Self>) {
        let InMemorySubscription {
            topic,
            receiver,
            topics,
        } = *self;
        drop(receiver);
        let mut guard = lock(&topics);
        if guard
            .get(&topic)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            guard.remove(&topic);
        }
    }
}
