use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::{ACTIVITY_START, MeetingDeps};
use crate::modules::meetings::application::errors::{MeetingError, ledger_err};
use crate::modules::meetings::application::ordering::PublishTicket;
use crate::modules::meetings::core::cycle::open_increment;
use crate::modules::meetings::core::events::MeetingEvent;
use crate::modules::meetings::core::meeting::{Increment, Meeting};
use crate::modules::meetings::core::views::MeetingView;
use crate::modules::meetings::use_cases::start_meeting::command::StartMeeting;
use crate::modules::meetings::use_cases::start_meeting::decide::decide_start;
use crate::shared::core::primitives::{Money, checked_amount, new_id};

const OPERATION: &str = "start_meeting";

pub struct StartMeetingHandler {
    deps: MeetingDeps,
}

impl StartMeetingHandler {
    pub fn new(deps: MeetingDeps) -> Self {
        Self { deps }
    }

    pub async fn handle(
        &self,
        context: &RequestContext,
        command: StartMeeting,
    ) -> Result<MeetingView, MeetingError> {
        let current = self
            .deps
            .load_authorized(
                context,
                OPERATION,
                command.actor_id,
                command.meeting_id,
                ACTIVITY_START,
            )
            .await?;
        let wage = self
            .deps
            .wages
            .org_default_wage(current.org_id)
            .await
            .map_err(|e| MeetingError::from_oracle(OPERATION, e))?;
        let wage = checked_amount(wage).ok_or_else(|| {
            MeetingError::Validation(format!("org default wage {wage} is not a usable amount"))
        })?;

        let (meeting, tail, ticket) = self
            .deps
            .with_ledger(context, OPERATION, || self.attempt(&command, wage))
            .await?;

        let event = MeetingEvent::Started {
            started_at: tail.start_time,
            increment: (&tail).into(),
        };
        self.deps.after_commit(context, ticket, meeting.id, Some(event)).await;

        tracing::info!(meeting_id = %meeting.id, actor_id = %command.actor_id, average_wage = tail.average_wage, "meeting started");
        self.deps.audit("meeting.start", command.actor_id, &meeting, None, &command.origin);
        Ok(MeetingView::from(&meeting))
    }

    async fn attempt(
        &self,
        command: &StartMeeting,
        wage: Money,
    ) -> Result<(Meeting, Increment, PublishTicket), MeetingError> {
        let mut tx = self.deps.ledger.begin().await.map_err(ledger_err(OPERATION))?;
        let mut meeting = tx
            .lock_meeting(command.meeting_id)
            .await
            .map_err(ledger_err(OPERATION))?;
        decide_start(&meeting)?;
        let ticket = self.deps.publish_ticket(meeting.id).await;

        let now = self.deps.clock.now();
        meeting.is_active = true;
        meeting.started_at = Some(now);
        meeting.stopped_at = None;
        meeting.updated_at = now;
        let tail = open_increment(new_id(), &meeting, now, 0, wage);

        tx.update_meeting(&meeting).await.map_err(ledger_err(OPERATION))?;
        tx.insert_increment(&tail).await.map_err(ledger_err(OPERATION))?;
        tx.commit().await.map_err(ledger_err(OPERATION))?;
        Ok((meeting, tail, ticket))
    }
}
