use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::{ACTIVITY_READ, MeetingDeps};
use crate::modules::meetings::application::errors::{MeetingError, ledger_err};
use crate::modules::meetings::core::cost::calculate;
use crate::modules::meetings::core::views::CostView;
use crate::modules::meetings::use_cases::get_meeting_cost::query::GetMeetingCost;

const OPERATION: &str = "get_meeting_cost";

pub struct GetMeetingCostHandler {
    deps: MeetingDeps,
}

impl GetMeetingCostHandler {
    pub fn new(deps: MeetingDeps) -> Self {
        Self { deps }
    }

    /// Live cost in any state. Meeting and increments come from one committed state,
    /// so a concurrent cycle is seen either entirely or not at all.
    pub async fn handle(
        &self,
        context: &RequestContext,
        query: GetMeetingCost,
    ) -> Result<CostView, MeetingError> {
        let (meeting, increments) = self
            .deps
            .with_ledger(context, OPERATION, || async {
                self.deps
                    .reader
                    .meeting_with_increments(query.meeting_id)
                    .await
                    .map_err(ledger_err(OPERATION))
            })
            .await?;
        self.deps
            .authorize(query.actor_id, meeting.org_id, Some(meeting.id), ACTIVITY_READ)
            .await?;

        Ok(calculate(&increments, self.deps.clock.now(), meeting.is_active))
    }
}
