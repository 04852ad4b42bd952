// Event bus port: topic-per-resource broadcast with at-most-once delivery.
//
// Contract
// - Messages on one topic reach each live subscriber in publish order.
// - Subscribers that are slow or disconnected miss messages; nothing is replayed.
// - Every subscription handle must be closed by its owner.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("event bus unavailable: {0}")]
    Unavailable(String),

    #[error("subscription to {topic} was closed by the bus")]
    Closed { topic: String },
}

#[async_trait]
pub trait EventBus: Send + Sync {
    /// Returns how many live subscribers the message was handed to.
    async fn publish(&self, topic: &str, message: String) -> Result<usize, BusError>;
    async fn subscribe(&self, topic: &str) -> Result<Box<dyn BusSubscription>, BusError>;
}

#[async_trait]
pub trait BusSubscription: Send {
    fn topic(&self) -> &str;

    /// Next message on the topic, or `None` once the topic has shut down.
    async fn recv(&mut self) -> Result<Option<String>, BusError>;

    async fn close(self: Box<Self>);
}

pub mod in_memory;
