// Event stream endpoint: forwards every message on a meeting's topic to one
// subscriber connection, one framed JSON message per event.
//
// Lifecycle
// - The stream owns exactly one bus subscription.
// - `pump` runs until the subscriber goes away, the request is cancelled, the
//   topic shuts down or the bus fails, and closes the subscription on every path.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::shared::infrastructure::event_bus::BusSubscription;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("subscriber disconnected")]
    Disconnected,
}

/// Where framed events go: a websocket, a GraphQL subscription, a test buffer.
#[async_trait]
pub trait EventSink: Send {
    async fn send(&mut self, frame: String) -> Result<(), SinkError>;
}

/// Forwards frames into a bounded channel. Fails once the receiver is dropped.
pub struct ChannelSink(pub mpsc::Sender<String>);

#[async_trait]
impl EventSink for ChannelSink {
    async fn send(&mut self, frame: String) -> Result<(), SinkError> {
        self.0.send(frame).await.map_err(|_| SinkError::Disconnected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    SubscriberGone,
    Cancelled,
    TopicClosed,
    BusFailed,
}

pub struct MeetingEventStream {
    meeting_id: Uuid,
    subscription: Box<dyn BusSubscription>,
}

impl MeetingEventStream {
    pub fn new(meeting_id: Uuid, subscription: Box<dyn BusSubscription>) -> Self {
        Self {
            meeting_id,
            subscription,
        }
    }

    pub fn meeting_id(&self) -> Uuid {
        self.meeting_id
    }

    pub async fn pump(mut self, sink: &mut dyn EventSink, cancel: &CancellationToken) -> StreamEnd {
        let meeting_id = self.meeting_id;
        let end = loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break StreamEnd::Cancelled,
                next = self.subscription.recv() => next,
            };
            match next {
                Ok(Some(frame)) => {
                    if sink.send(frame).await.is_err() {
                        break StreamEnd::SubscriberGone;
                    }
                }
                Ok(None) => break StreamEnd::TopicClosed,
                Err(error) => {
                    tracing::warn!(%meeting_id, %error, "event stream lost its bus subscription");
                    break StreamEnd::BusFailed;
                }
            }
        };
        self.subscription.close().await;
        tracing::debug!(%meeting_id, ?end, "event stream closed");
        end
    }
}
