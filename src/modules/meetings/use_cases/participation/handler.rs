use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::{ACTIVITY_READ, ACTIVITY_UPDATE, MeetingDeps};
use crate::modules::meetings::application::errors::{MeetingError, ledger_err};
use crate::modules::meetings::application::ordering::PublishTicket;
use crate::modules::meetings::core::events::{MeetingEvent, ParticipantAction};
use crate::modules::meetings::core::meeting::Participant;
use crate::modules::meetings::core::views::ParticipantView;
use crate::modules::meetings::use_cases::participation::command::{
    JoinMeeting, LeaveMeeting, ListParticipants,
};
use crate::modules::meetings::use_cases::participation::decide::{decide_join, decide_leave};
use crate::shared::core::primitives::new_id;

const JOIN: &str = "join_meeting";
const LEAVE: &str = "leave_meeting";
const LIST: &str = "list_participants";

/// Membership of people in a meeting. Never touches the increment ledger.
pub struct ParticipationHandler {
    deps: MeetingDeps,
}

impl ParticipationHandler {
    pub fn new(deps: MeetingDeps) -> Self {
        Self { deps }
    }

    pub async fn join(
        &self,
        context: &RequestContext,
        command: JoinMeeting,
    ) -> Result<ParticipantView, MeetingError> {
        self.deps
            .load_authorized(context, JOIN, command.actor_id, command.meeting_id, ACTIVITY_UPDATE)
            .await?;

        let (participant, ticket) = self
            .deps
            .with_ledger(context, JOIN, || self.attempt_join(&command))
            .await?;
        let event = MeetingEvent::participant(&participant, ParticipantAction::Joined);
        self.deps.after_commit(context, ticket, command.meeting_id, Some(event)).await;

        tracing::info!(meeting_id = %command.meeting_id, person_id = %command.person_id, "participant joined");
        Ok(ParticipantView::from(&participant))
    }

    pub async fn leave(
        &self,
        context: &RequestContext,
        command: LeaveMeeting,
    ) -> Result<ParticipantView, MeetingError> {
        self.deps
            .load_authorized(context, LEAVE, command.actor_id, command.meeting_id, ACTIVITY_UPDATE)
            .await?;

        let (participant, ticket) = self
            .deps
            .with_ledger(context, LEAVE, || self.attempt_leave(&command))
            .await?;
        let event = MeetingEvent::participant(&participant, ParticipantAction::Left);
        self.deps.after_commit(context, ticket, command.meeting_id, Some(event)).await;

        tracing::info!(meeting_id = %command.meeting_id, person_id = %command.person_id, "participant left");
        Ok(ParticipantView::from(&participant))
    }

    pub async fn list(
        &self,
        context: &RequestContext,
        query: ListParticipants,
    ) -> Result<Vec<ParticipantView>, MeetingError> {
        self.deps
            .load_authorized(context, LIST, query.actor_id, query.meeting_id, ACTIVITY_READ)
            .await?;
        let participants = self
            .deps
            .with_ledger(context, LIST, || async {
                self.deps
                    .ledger
                    .list_participants(query.meeting_id)
                    .await
                    .map_err(ledger_err(LIST))
            })
            .await?;
        Ok(participants.iter().map(ParticipantView::from).collect())
    }

    async fn attempt_join(
        &self,
        command: &JoinMeeting,
    ) -> Result<(Participant, PublishTicket), MeetingError> {
        let mut tx = self.deps.ledger.begin().await.map_err(ledger_err(JOIN))?;
        let meeting = tx.lock_meeting(command.meeting_id).await.map_err(ledger_err(JOIN))?;
        let participants = tx.list_participants(meeting.id).await.map_err(ledger_err(JOIN))?;
        decide_join(&meeting, &participants, command.person_id)?;
        let ticket = self.deps.publish_ticket(meeting.id).await;

        let now = self.deps.clock.now();
        let participant = Participant {
            id: new_id(),
            meeting_id: meeting.id,
            person_id: command.person_id,
            joined_at: now,
            left_at: None,
            created_at: now,
            updated_at: now,
        };
        tx.insert_participant(&participant).await.map_err(ledger_err(JOIN))?;
        tx.commit().await.map_err(ledger_err(JOIN))?;
        Ok((participant, ticket))
    }

    async fn attempt_leave(
        &self,
        command: &LeaveMeeting,
    ) -> Result<(Participant, PublishTicket), MeetingError> {
        let mut tx = self.deps.ledger.begin().await.map_err(ledger_err(LEAVE))?;
        let meeting = tx.lock_meeting(command.meeting_id).await.map_err(ledger_err(LEAVE))?;
        let participants = tx.list_participants(meeting.id).await.map_err(ledger_err(LEAVE))?;
        let open = decide_leave(&meeting, &participants, command.person_id)?;
        let ticket = self.deps.publish_ticket(meeting.id).await;

        let now = self.deps.clock.now();
        let participant = Participant {
            left_at: Some(now.max(open.joined_at)),
            updated_at: now,
            ..open.clone()
        };
        tx.update_participant(&participant).await.map_err(ledger_err(LEAVE))?;
        tx.commit().await.map_err(ledger_err(LEAVE))?;
        Ok((participant, ticket))
    }
}
