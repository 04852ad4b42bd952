// Publishes committed meeting events on the meeting's topic. Best effort: failures
// are logged and swallowed.

use uuid::Uuid;

use crate::modules::meetings::core::events::MeetingEvent;
use crate::modules::meetings::core::keys::meeting_topic;
use crate::shared::infrastructure::event_bus::EventBus;

/// Returns how many subscribers received the event.
pub async fn publish_event(bus: &dyn EventBus, meeting_id: Uuid, event: MeetingEvent) -> usize {
    let event_type = event.event_type().as_str();
    let message = match event
        .into_envelope(meeting_id)
        .and_then(|envelope| serde_json::to_string(&envelope))
    {
        Ok(message) => message,
        Err(error) => {
            tracing::warn!(%meeting_id, %event_type, %error, "event could not be encoded");
            return 0;
        }
    };

    match bus.publish(&meeting_topic(meeting_id), message).await {
        Ok(delivered) => {
            tracing::debug!(%meeting_id, %event_type, delivered, "event published");
            delivered
        }
        Err(error) => {
            tracing::warn!(%meeting_id, %event_type, %error, "event publish failed");
            0
        }
    }
}
