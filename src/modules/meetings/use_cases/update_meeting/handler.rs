use crate::modules::meetings::adapters::outbound::ledger::LedgerTransaction;
use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::{ACTIVITY_UPDATE, MeetingDeps};
use crate::modules::meetings::application::errors::{MeetingError, ledger_err};
use crate::modules::meetings::application::ordering::PublishTicket;
use crate::modules::meetings::application::rollups::{open_tail, rebuild_rollups};
use crate::modules::meetings::core::cycle::{CycleOutcome, ParameterChange, cycle_increment};
use crate::modules::meetings::core::events::MeetingEvent;
use crate::modules::meetings::core::meeting::Meeting;
use crate::modules::meetings::core::views::MeetingView;
use crate::modules::meetings::use_cases::update_meeting::command::UpdateMeeting;
use crate::modules::meetings::use_cases::update_meeting::decide::{UpdatePlan, decide_update};
use crate::shared::core::primitives::new_id;

const OPERATION: &str = "update_meeting";

pub struct UpdateMeetingHandler {
    deps: MeetingDeps,
}

struct Updated {
    meeting: Meeting,
    event: Option<MeetingEvent>,
    ticket: PublishTicket,
}

impl UpdateMeetingHandler {
    pub fn new(deps: MeetingDeps) -> Self {
        Self { deps }
    }

    pub async fn handle(
        &self,
        context: &RequestContext,
        command: UpdateMeeting,
    ) -> Result<MeetingView, MeetingError> {
        self.deps
            .load_authorized(
                context,
                OPERATION,
                command.actor_id,
                command.meeting_id,
                ACTIVITY_UPDATE,
            )
            .await?;

        let Updated { meeting, event, ticket } = self
            .deps
            .with_ledger(context, OPERATION, || self.attempt(&command))
            .await?;
        self.deps.after_commit(context, ticket, meeting.id, event).await;

        tracing::info!(
            meeting_id = %meeting.id,
            actor_id = %command.actor_id,
            parameter = command.change.name(),
            "meeting parameter changed"
        );
        if let ParameterChange::AttendeeCount(count) = command.change {
            self.deps.audit(
                "meeting.attendee_count",
                command.actor_id,
                &meeting,
                Some(serde_json::json!({ "attendee_count": count })),
                &command.origin,
            );
        }
        Ok(MeetingView::from(&meeting))
    }

    async fn attempt(&self, command: &UpdateMeeting) -> Result<Updated, MeetingError> {
        let mut tx = self.deps.ledger.begin().await.map_err(ledger_err(OPERATION))?;
        let mut meeting = tx
            .lock_meeting(command.meeting_id)
            .await
            .map_err(ledger_err(OPERATION))?;
        let plan = decide_update(&meeting, &command.change)?;
        let ticket = self.deps.publish_ticket(meeting.id).await;
        let now = self.deps.clock.now();

        let event = match plan {
            UpdatePlan::RenameDraft(purpose) => {
                meeting.purpose = purpose;
                None
            }
            UpdatePlan::Cycle(change) => {
                Some(self.cycle(tx.as_mut(), &mut meeting, change, now).await?)
            }
        };

        meeting.updated_at = now.max(meeting.updated_at);
        tx.update_meeting(&meeting).await.map_err(ledger_err(OPERATION))?;
        tx.commit().await.map_err(ledger_err(OPERATION))?;
        Ok(Updated { meeting, event, ticket })
    }

    async fn cycle(
        &self,
        tx: &mut dyn LedgerTransaction,
        meeting: &mut Meeting,
        change: ParameterChange,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<MeetingEvent, MeetingError> {
        let tail = open_tail(tx, meeting, OPERATION).await?;
        let outcome = cycle_increment(&tail, now, &change, new_id());
        match &outcome {
            CycleOutcome::Coalesced { tail } => {
                tracing::debug!(meeting_id = %meeting.id, increment_id = %tail.id, "change coalesced into the open tail");
                tx.update_increment(tail).await.map_err(ledger_err(OPERATION))?;
            }
            CycleOutcome::Cycled { closed, opened } => {
                tx.update_increment(closed).await.map_err(ledger_err(OPERATION))?;
                tx.insert_increment(opened).await.map_err(ledger_err(OPERATION))?;
                rebuild_rollups(tx, meeting, OPERATION).await?;
            }
        }
        if let ParameterChange::Purpose(purpose) = &change {
            meeting.purpose = purpose.clone();
        }

        Ok(MeetingEvent::ParameterChanged {
            event_type: change.event_type(),
            increment: outcome.open_tail().into(),
            rollups: (&*meeting).into(),
        })
    }
}

#[cfg(test)]
mod update_meeting_handler_tests {
    use super::*;
    use crate::modules::meetings::core::events::MeetingEventType;
    use crate::shared::infrastructure::event_bus::BusSubscription;
    use crate::tests::fixtures::harness::{Harness, before_each};
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_split_the_ledger_on_a_wage_change(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let active = harness.active("planning").await;
        harness.set_attendees(active.id, 2).await;
        harness.set_wage(active.id, 30.0).await;
        harness.clock.advance(Duration::seconds(1800));

        let view = harness.set_wage(active.id, 60.0).await;

        let rows = harness.ledger.increment_rows(active.id).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].stop_time, Some(rows[1].start_time));
        assert_eq!(rows[0].cost, 30.0);
        assert_eq!(rows[0].running_total, 30.0);
        assert!(rows[1].is_open());
        assert_eq!(rows[1].average_wage, 60.0);
        assert_eq!(rows[1].attendee_count, 2);
        assert_eq!(view.total_cost, 30.0);
        assert_eq!(view.total_duration_seconds, 1800);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_coalesce_changes_at_the_same_instant(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let active = harness.active("planning").await;

        harness.set_attendees(active.id, 5).await;

        let rows = harness.ledger.increment_rows(active.id).await;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_open());
        assert_eq!(rows[0].attendee_count, 5);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_cycle_even_when_the_value_is_unchanged(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let active = harness.active("planning").await;
        harness.set_attendees(active.id, 3).await;
        harness.clock.advance(Duration::seconds(10));

        harness.set_attendees(active.id, 3).await;

        assert_eq!(harness.ledger.increment_rows(active.id).await.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_publish_the_new_tail_parameters(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let active = harness.active("planning").await;
        let mut subscription = harness.subscribe(active.id).await;
        harness.clock.advance(Duration::seconds(10));

        harness.set_attendees(active.id, 7).await;
        harness.set_purpose(active.id, "retro").await;

        let first = harness.next_envelope(&mut subscription).await;
        assert_eq!(first.event_type, MeetingEventType::AttendeeCount);
        assert_eq!(first.payload["increment"]["attendee_count"], 7);
        let second = harness.next_envelope(&mut subscription).await;
        assert_eq!(second.event_type, MeetingEventType::Cost);
        assert_eq!(second.payload["increment"]["purpose"], "retro");
        subscription.close().await;
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_rename_a_draft_without_increments(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let draft = harness.draft("planning").await;

        let view = harness.set_purpose(draft.id, "retro").await;

        assert_eq!(view.purpose, "retro");
        assert!(harness.ledger.increment_rows(draft.id).await.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refuse_counts_on_a_draft(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let draft = harness.draft("planning").await;
        let command = UpdateMeeting::attendee_count(draft.id, harness.actor_id, 3);
        let result = harness.app.update_meeting.handle(&harness.context(), command).await;
        assert!(matches!(result, Err(MeetingError::InvalidState(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_negative_wage(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let active = harness.active("planning").await;
        let command = UpdateMeeting::average_wage(active.id, harness.actor_id, -5.0);
        let result = harness.app.update_meeting.handle(&harness.context(), command).await;
        assert!(matches!(result, Err(MeetingError::Validation(_))));
        assert_eq!(harness.ledger.increment_rows(active.id).await.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_audit_attendee_changes(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let active = harness.active("planning").await;
        let command = UpdateMeeting::attendee_count(active.id, harness.actor_id, 4);
        harness.app.update_meeting.handle(&harness.context(), command).await.unwrap();

        let entries = harness.audit.settled_entries(3).await;
        let entry = entries
            .iter()
            .find(|e| e.action == "meeting.attendee_count")
            .unwrap();
        assert_eq!(entry.details.as_ref().unwrap()["attendee_count"], 4);
    }
}
