use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::{ACTIVITY_DELETE, MeetingDeps};
use crate::modules::meetings::application::errors::{MeetingError, ledger_err};
use crate::modules::meetings::application::ordering::PublishTicket;
use crate::modules::meetings::application::rollups::stop_in_place;
use crate::modules::meetings::core::events::MeetingEvent;
use crate::modules::meetings::core::meeting::Meeting;
use crate::modules::meetings::use_cases::delete_meeting::command::DeleteMeeting;
use crate::modules::meetings::use_cases::delete_meeting::decide::{DeletePlan, decide_delete};

const OPERATION: &str = "delete_meeting";

pub struct DeleteMeetingHandler {
    deps: MeetingDeps,
}

impl DeleteMeetingHandler {
    pub fn new(deps: MeetingDeps) -> Self {
        Self { deps }
    }

    pub async fn handle(
        &self,
        context: &RequestContext,
        command: DeleteMeeting,
    ) -> Result<(), MeetingError> {
        self.deps
            .load_authorized(
                context,
                OPERATION,
                command.actor_id,
                command.meeting_id,
                ACTIVITY_DELETE,
            )
            .await?;

        let (meeting, plan, ticket) = self
            .deps
            .with_ledger(context, OPERATION, || self.attempt(&command))
            .await?;

        // Subscribers of a running meeting still see it end.
        let event = match plan {
            DeletePlan::StopThenTombstone => Some(MeetingEvent::Stopped {
                stopped_at: meeting.stopped_at.unwrap_or(meeting.updated_at),
                rollups: (&meeting).into(),
            }),
            DeletePlan::Tombstone => None,
        };
        self.deps.after_commit(context, ticket, meeting.id, event).await;

        tracing::info!(meeting_id = %meeting.id, actor_id = %command.actor_id, ?plan, "meeting deleted");
        self.deps.audit("meeting.delete", command.actor_id, &meeting, None, &command.origin);
        Ok(())
    }

    async fn attempt(
        &self,
        command: &DeleteMeeting,
    ) -> Result<(Meeting, DeletePlan, PublishTicket), MeetingError> {
        let mut tx = self.deps.ledger.begin().await.map_err(ledger_err(OPERATION))?;
        let mut meeting = tx
            .lock_meeting(command.meeting_id)
            .await
            .map_err(ledger_err(OPERATION))?;
        let plan = decide_delete(&meeting)?;
        let ticket = self.deps.publish_ticket(meeting.id).await;
        let now = self.deps.clock.now();

        if plan == DeletePlan::StopThenTombstone {
            stop_in_place(tx.as_mut(), &mut meeting, now, OPERATION).await?;
            tx.update_meeting(&meeting).await.map_err(ledger_err(OPERATION))?;
        }
        tx.soft_delete_meeting(meeting.id, now)
            .await
            .map_err(ledger_err(OPERATION))?;
        tx.commit().await.map_err(ledger_err(OPERATION))?;

        meeting.deleted_at = Some(now);
        meeting.updated_at = now;
        Ok((meeting, plan, ticket))
    }
}
