use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::{ACTIVITY_READ, MeetingDeps};
use crate::modules::meetings::application::errors::MeetingError;
use crate::modules::meetings::core::views::MeetingView;
use crate::modules::meetings::use_cases::get_meeting::query::GetMeeting;

const OPERATION: &str = "get_meeting";

pub struct GetMeetingHandler {
    deps: MeetingDeps,
}

impl GetMeetingHandler {
    pub fn new(deps: MeetingDeps) -> Self {
        Self { deps }
    }

    pub async fn handle(
        &self,
        context: &RequestContext,
        query: GetMeeting,
    ) -> Result<MeetingView, MeetingError> {
        let meeting = self
            .deps
            .load_authorized(context, OPERATION, query.actor_id, query.meeting_id, ACTIVITY_READ)
            .await?;
        Ok(MeetingView::from(&meeting))
    }
}
