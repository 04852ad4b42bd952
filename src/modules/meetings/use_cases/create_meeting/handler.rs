use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::{ACTIVITY_CREATE, MeetingDeps};
use crate::modules::meetings::application::errors::{MeetingError, ledger_err};
use crate::modules::meetings::core::meeting::Meeting;
use crate::modules::meetings::core::views::MeetingView;
use crate::modules::meetings::use_cases::create_meeting::command::CreateMeeting;
use crate::modules::meetings::use_cases::create_meeting::decide::decide_create;
use crate::shared::core::primitives::new_id;

const OPERATION: &str = "create_meeting";

pub struct CreateMeetingHandler {
    deps: MeetingDeps,
}

impl CreateMeetingHandler {
    pub fn new(deps: MeetingDeps) -> Self {
        Self { deps }
    }

    pub async fn handle(
        &self,
        context: &RequestContext,
        command: CreateMeeting,
    ) -> Result<MeetingView, MeetingError> {
        self.deps
            .authorize(command.actor_id, command.org_id, None, ACTIVITY_CREATE)
            .await?;

        let meeting = self
            .deps
            .with_ledger(context, OPERATION, || self.attempt(&command))
            .await?;

        tracing::info!(meeting_id = %meeting.id, org_id = %meeting.org_id, actor_id = %command.actor_id, "meeting created");
        self.deps.audit(
            "meeting.create",
            command.actor_id,
            &meeting,
            Some(serde_json::json!({ "purpose": meeting.purpose })),
            &command.origin,
        );
        Ok(MeetingView::from(&meeting))
    }

    async fn attempt(&self, command: &CreateMeeting) -> Result<Meeting, MeetingError> {
        let mut tx = self.deps.ledger.begin().await.map_err(ledger_err(OPERATION))?;

        let external = command.external();
        if let Some((kind, id)) = &external {
            let existing = tx
                .lookup_by_external(kind, id)
                .await
                .map_err(ledger_err(OPERATION))?;
            decide_create(existing.as_ref())?;
        }

        let meeting = Meeting::draft(
            new_id(),
            command.org_id,
            command.actor_id,
            command.purpose.clone().unwrap_or_default(),
            external,
            self.deps.clock.now(),
        );
        tx.insert_meeting(&meeting).await.map_err(ledger_err(OPERATION))?;
        tx.commit().await.map_err(ledger_err(OPERATION))?;
        Ok(meeting)
    }
}
