use chrono::Duration;
use rstest::rstest;
use uuid::Uuid;

use crate::modules::meetings::application::errors::MeetingError;
use crate::modules::meetings::core::views::CostView;
use crate::modules::meetings::use_cases::get_meeting_cost::query::GetMeetingCost;
use crate::tests::fixtures::commands::CreateMeetingBuilder;
use crate::tests::fixtures::harness::{Harness, before_each};

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "expected {expected}, got {actual}");
}

async fn cost(harness: &Harness, meeting_id: Uuid) -> CostView {
    harness
        .app
        .get_meeting_cost
        .handle(
            &harness.context(),
            GetMeetingCost {
                meeting_id,
                actor_id: harness.actor_id,
            },
        )
        .await
        .unwrap()
}

#[rstest]
#[tokio::test]
async fn basic_accrual_is_stable_across_stop(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let meeting = harness.active("standup").await;
    harness.set_attendees(meeting.id, 4).await;
    harness.set_wage(meeting.id, 60.0).await;
    harness.clock.advance(Duration::seconds(900));

    let live = cost(&harness, meeting.id).await;
    assert_close(live.total_cost, 60.0);
    assert_eq!(live.total_duration_seconds, 900);
    assert_close(live.cost_per_hour, 240.0);

    harness
        .app
        .stop_meeting
        .handle(&harness.context(), harness.stop_command(meeting.id))
        .await
        .unwrap();
    harness.clock.advance(Duration::seconds(600));

    let after = cost(&harness, meeting.id).await;
    assert_close(after.total_cost, 60.0);
    assert_eq!(after.total_duration_seconds, 900);
    assert_close(after.cost_per_hour, 240.0);
    assert!(!harness.get(meeting.id).await.is_active);
}

#[rstest]
#[tokio::test]
async fn a_wage_change_splits_the_ledger(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let meeting = harness.active("planning").await;
    harness.set_attendees(meeting.id, 2).await;
    harness.set_wage(meeting.id, 30.0).await;
    harness.clock.advance(Duration::seconds(1800));
    harness.set_wage(meeting.id, 60.0).await;
    harness.clock.advance(Duration::seconds(1800));

    let stopped = harness
        .app
        .stop_meeting
        .handle(&harness.context(), harness.stop_command(meeting.id))
        .await
        .unwrap();

    let rows = harness.ledger.increment_rows(meeting.id).await;
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].elapsed_time, rows[0].cost), (1800, 30.0));
    assert_eq!((rows[1].elapsed_time, rows[1].cost), (1800, 60.0));
    assert_eq!(rows[0].stop_time, Some(rows[1].start_time));
    assert_eq!(rows[1].running_total, 90.0);
    assert_eq!(stopped.total_cost, 90.0);
    assert_eq!(stopped.total_duration_seconds, 3600);
    assert_eq!(stopped.max_attendees, 2);
}

#[rstest]
#[tokio::test]
async fn a_change_at_the_start_instant_coalesces(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let meeting = harness.active("planning").await;

    harness.set_attendees(meeting.id, 5).await;

    let rows = harness.ledger.increment_rows(meeting.id).await;
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_open());
    assert_eq!(rows[0].attendee_count, 5);
    assert_eq!(rows[0].elapsed_time, 0);
}

#[rstest]
#[tokio::test]
async fn invalid_transitions_leave_the_ledger_alone(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let draft = harness.draft("planning").await;
    let active = harness.active("review").await;
    let commits = harness.ledger.commits();

    let stop_draft = harness
        .app
        .stop_meeting
        .handle(&harness.context(), harness.stop_command(draft.id))
        .await;
    let restart = harness
        .app
        .start_meeting
        .handle(&harness.context(), harness.start_command(active.id))
        .await;

    assert!(matches!(stop_draft, Err(MeetingError::InvalidState(_))));
    assert!(matches!(restart, Err(MeetingError::InvalidState(_))));
    assert_eq!(harness.ledger.commits(), commits);
    assert!(harness.ledger.increment_rows(draft.id).await.is_empty());
    assert_eq!(harness.ledger.increment_rows(active.id).await.len(), 1);
}

#[rstest]
#[tokio::test]
async fn a_stopped_meeting_cannot_restart(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let stopped = harness.stopped("planning").await;

    let result = harness
        .app
        .start_meeting
        .handle(&harness.context(), harness.start_command(stopped.id))
        .await;

    assert!(matches!(result, Err(MeetingError::InvalidState(_))));
}

#[rstest]
#[tokio::test]
async fn external_ids_deduplicate_meetings(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let command = CreateMeetingBuilder::new()
        .org(harness.org_id)
        .actor(harness.actor_id)
        .purpose("zoom call")
        .external("zoom", "abc")
        .build();

    let first = harness
        .app
        .create_meeting
        .handle(&harness.context(), command.clone())
        .await
        .unwrap();
    let second = harness.app.create_meeting.handle(&harness.context(), command).await;

    assert!(matches!(second, Err(MeetingError::Conflict(_))));
    assert_eq!(harness.get(first.id).await, first);
}
