use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::{ACTIVITY_STOP, MeetingDeps};
use crate::modules::meetings::application::errors::{MeetingError, ledger_err};
use crate::modules::meetings::application::ordering::PublishTicket;
use crate::modules::meetings::application::rollups::stop_in_place;
use crate::modules::meetings::core::events::MeetingEvent;
use crate::modules::meetings::core::meeting::Meeting;
use crate::modules::meetings::core::views::MeetingView;
use crate::modules::meetings::use_cases::stop_meeting::command::StopMeeting;
use crate::modules::meetings::use_cases::stop_meeting::decide::decide_stop;

const OPERATION: &str = "stop_meeting";

pub struct StopMeetingHandler {
    deps: MeetingDeps,
}

impl StopMeetingHandler {
    pub fn new(deps: MeetingDeps) -> Self {
        Self { deps }
    }

    pub async fn handle(
        &self,
        context: &RequestContext,
        command: StopMeeting,
    ) -> Result<MeetingView, MeetingError> {
        self.deps
            .load_authorized(
                context,
                OPERATION,
                command.actor_id,
                command.meeting_id,
                ACTIVITY_STOP,
            )
            .await?;

        let (meeting, ticket) = self
            .deps
            .with_ledger(context, OPERATION, || self.attempt(&command))
            .await?;

        let event = MeetingEvent::Stopped {
            stopped_at: meeting.stopped_at.unwrap_or(meeting.updated_at),
            rollups: (&meeting).into(),
        };
        self.deps.after_commit(context, ticket, meeting.id, Some(event)).await;

        tracing::info!(
            meeting_id = %meeting.id,
            actor_id = %command.actor_id,
            total_cost = meeting.total_cost_cached,
            total_duration = meeting.total_duration_cached,
            "meeting stopped"
        );
        self.deps.audit(
            "meeting.stop",
            command.actor_id,
            &meeting,
            Some(serde_json::json!({
                "total_cost": meeting.total_cost_cached,
                "total_duration_seconds": meeting.total_duration_cached,
            })),
            &command.origin,
        );
        Ok(MeetingView::from(&meeting))
    }

    async fn attempt(
        &self,
        command: &StopMeeting,
    ) -> Result<(Meeting, PublishTicket), MeetingError> {
        let mut tx = self.deps.ledger.begin().await.map_err(ledger_err(OPERATION))?;
        let mut meeting = tx
            .lock_meeting(command.meeting_id)
            .await
            .map_err(ledger_err(OPERATION))?;
        decide_stop(&meeting)?;
        let ticket = self.deps.publish_ticket(meeting.id).await;

        stop_in_place(tx.as_mut(), &mut meeting, self.deps.clock.now(), OPERATION).await?;
        tx.update_meeting(&meeting).await.map_err(ledger_err(OPERATION))?;
        tx.commit().await.map_err(ledger_err(OPERATION))?;
        Ok((meeting, ticket))
    }
}
