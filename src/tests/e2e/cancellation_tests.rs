use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use tokio_util::sync::CancellationToken;

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::application::deps::EngineSettings;
use crate::modules::meetings::application::errors::MeetingError;
use crate::modules::meetings::core::events::{MeetingEvent, RollupSnapshot};
use crate::modules::meetings::core::keys::meeting_key;
use crate::shared::core::clock::ManualClock;
use crate::shared::infrastructure::cache::Cache;
use crate::shared::infrastructure::event_bus::BusSubscription;
use crate::tests::fixtures::harness::{Harness, before_each, test_settings};
use crate::tests::fixtures::meetings::fixed_now;

fn cancelled() -> RequestContext {
    let cancel = CancellationToken::new();
    cancel.cancel();
    RequestContext::new(cancel)
}

async fn quiet(subscription: &mut Box<dyn BusSubscription>) -> bool {
    tokio::time::timeout(Duration::from_millis(50), subscription.recv())
        .await
        .is_err()
}

#[rstest]
#[tokio::test]
async fn a_cancelled_request_changes_nothing(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let meeting = harness.active("planning").await;
    let mut subscription = harness.subscribe(meeting.id).await;
    let commits = harness.ledger.commits();

    let result = harness
        .app
        .stop_meeting
        .handle(&cancelled(), harness.stop_command(meeting.id))
        .await;

    assert!(matches!(result, Err(MeetingError::Cancelled)));
    assert_eq!(harness.ledger.commits(), commits);
    assert!(harness.get(meeting.id).await.is_active);
    assert!(quiet(&mut subscription).await);
}

#[rstest]
#[tokio::test]
async fn cancellation_after_commit_invalidates_but_does_not_publish(
    #[future(awt)] before_each: Harness,
) {
    let harness = before_each;
    let meeting = harness.active("planning").await;
    harness.get(meeting.id).await;
    assert!(harness.cache.get(&meeting_key(meeting.id)).await.unwrap().is_some());
    let mut subscription = harness.subscribe(meeting.id).await;

    let event = MeetingEvent::Stopped {
        stopped_at: fixed_now(),
        rollups: RollupSnapshot {
            total_cost: 0.0,
            total_duration_seconds: 0,
            max_attendees: 0,
        },
    };
    let ticket = harness.deps.publish_ticket(meeting.id).await;
    harness
        .deps
        .after_commit(&cancelled(), ticket, meeting.id, Some(event))
        .await;

    assert!(harness.cache.get(&meeting_key(meeting.id)).await.unwrap().is_none());
    assert!(quiet(&mut subscription).await);
}

#[rstest]
#[tokio::test]
async fn a_slow_commit_times_out_and_rolls_back() {
    let settings = EngineSettings {
        ledger_timeout: Duration::from_millis(20),
        ..test_settings()
    };
    let harness = Harness::build(Arc::new(ManualClock::new(fixed_now())), settings).await;
    let draft = harness.draft("planning").await;
    harness.ledger.set_delay_commit_ms(200);

    let result = harness
        .app
        .start_meeting
        .handle(&harness.context(), harness.start_command(draft.id))
        .await;

    assert!(matches!(result, Err(MeetingError::Timeout { .. })));
    harness.ledger.set_delay_commit_ms(0);
    let stored = harness.ledger.meeting_row(draft.id).await.unwrap();
    assert!(!stored.is_active);
    assert!(harness.ledger.increment_rows(draft.id).await.is_empty());
}

#[rstest]
#[tokio::test]
async fn an_offline_ledger_surfaces_as_internal(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let draft = harness.draft("planning").await;
    harness.ledger.toggle_offline();

    let result = harness
        .app
        .start_meeting
        .handle(&harness.context(), harness.start_command(draft.id))
        .await;

    assert!(matches!(result, Err(MeetingError::Internal { .. })));
}
