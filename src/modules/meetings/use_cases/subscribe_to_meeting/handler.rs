use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::{ACTIVITY_READ, MeetingDeps};
use crate::modules::meetings::application::errors::MeetingError;
use crate::modules::meetings::core::keys::meeting_topic;
use crate::modules::meetings::use_cases::subscribe_to_meeting::query::SubscribeToMeeting;
use crate::modules::meetings::use_cases::subscribe_to_meeting::stream::MeetingEventStream;

const OPERATION: &str = "subscribe_to_meeting";

pub struct SubscribeToMeetingHandler {
    deps: MeetingDeps,
}

impl SubscribeToMeetingHandler {
    pub fn new(deps: MeetingDeps) -> Self {
        Self { deps }
    }

    /// Authorization happens once, here. The returned stream only carries events
    /// published after this call.
    pub async fn handle(
        &self,
        context: &RequestContext,
        query: SubscribeToMeeting,
    ) -> Result<MeetingEventStream, MeetingError> {
        let meeting = self
            .deps
            .load_authorized(context, OPERATION, query.actor_id, query.meeting_id, ACTIVITY_READ)
            .await?;
        let subscription = self
            .deps
            .bus
            .subscribe(&meeting_topic(meeting.id))
            .await
            .map_err(|e| MeetingError::internal(OPERATION, e))?;

        tracing::debug!(meeting_id = %meeting.id, actor_id = %query.actor_id, "event stream opened");
        Ok(MeetingEventStream::new(meeting.id, subscription))
    }
}
