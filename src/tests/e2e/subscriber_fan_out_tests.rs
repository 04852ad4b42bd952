use std::time::Duration as StdDuration;

use chrono::Duration;
use rstest::rstest;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::modules::meetings::core::events::{EventEnvelope, MeetingEventType};
use crate::modules::meetings::use_cases::subscribe_to_meeting::query::SubscribeToMeeting;
use crate::modules::meetings::use_cases::subscribe_to_meeting::stream::{ChannelSink, StreamEnd};
use crate::tests::fixtures::harness::{Harness, before_each};

struct Watcher {
    frames: mpsc::Receiver<String>,
    cancel: CancellationToken,
    pump: tokio::task::JoinHandle<StreamEnd>,
}

impl Watcher {
    async fn open(harness: &Harness, meeting_id: Uuid) -> Self {
        let stream = harness
            .app
            .subscribe_to_meeting
            .handle(
                &harness.context(),
                SubscribeToMeeting {
                    meeting_id,
                    actor_id: harness.actor_id,
                },
            )
            .await
            .unwrap();
        let (tx, frames) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let pump = tokio::spawn(async move { stream.pump(&mut ChannelSink(tx), &token).await });
        Self { frames, cancel, pump }
    }

    async fn next(&mut self) -> EventEnvelope {
        let frame = tokio::time::timeout(StdDuration::from_secs(1), self.frames.recv())
            .await
            .expect("no event within a second")
            .expect("stream ended");
        serde_json::from_str(&frame).unwrap()
    }

    async fn drain(&mut self, count: usize) -> Vec<MeetingEventType> {
        let mut types = Vec::with_capacity(count);
        for _ in 0..count {
            types.push(self.next().await.event_type);
        }
        types
    }

    async fn close(self) -> StreamEnd {
        self.cancel.cancel();
        self.pump.await.unwrap()
    }
}

async fn run_meeting(harness: &Harness, meeting_id: Uuid) {
    harness.start(meeting_id).await;
    for count in [2, 3, 4] {
        harness.clock.advance(Duration::seconds(60));
        harness.set_attendees(meeting_id, count).await;
    }
    harness.clock.advance(Duration::seconds(60));
    harness
        .app
        .stop_meeting
        .handle(&harness.context(), harness.stop_command(meeting_id))
        .await
        .unwrap();
}

#[rstest]
#[tokio::test]
async fn every_subscriber_sees_the_same_ordered_events(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let meeting = harness.draft("all hands").await;
    let mut first = Watcher::open(&harness, meeting.id).await;
    let mut second = Watcher::open(&harness, meeting.id).await;

    run_meeting(&harness, meeting.id).await;

    let expected = vec![
        MeetingEventType::Started,
        MeetingEventType::AttendeeCount,
        MeetingEventType::AttendeeCount,
        MeetingEventType::AttendeeCount,
        MeetingEventType::Stopped,
    ];
    assert_eq!(first.drain(5).await, expected);
    assert_eq!(second.drain(5).await, expected);
    assert_eq!(first.close().await, StreamEnd::Cancelled);
    assert_eq!(second.close().await, StreamEnd::Cancelled);
}

#[rstest]
#[tokio::test]
async fn a_late_subscriber_only_sees_later_events(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let meeting = harness.active("all hands").await;
    harness.clock.advance(Duration::seconds(60));
    harness.set_attendees(meeting.id, 2).await;

    let mut late = Watcher::open(&harness, meeting.id).await;
    harness.clock.advance(Duration::seconds(60));
    harness.set_wage(meeting.id, 90.0).await;

    let envelope = late.next().await;
    assert_eq!(envelope.event_type, MeetingEventType::AverageWage);
    assert_eq!(envelope.meeting_id, meeting.id);
    assert_eq!(envelope.payload["increment"]["average_wage"], 90.0);
    assert_eq!(envelope.payload["increment"]["attendee_count"], 2);
    late.close().await;
}

#[rstest]
#[tokio::test]
async fn the_stopped_event_carries_final_rollups(#[future(awt)] before_each: Harness) {
    let harness = before_each;
    let meeting = harness.draft("retro").await;
    harness.oracle.set_org_wage(harness.org_id, 60.0).await;
    let mut subscription = harness.subscribe(meeting.id).await;

    run_meeting(&harness, meeting.id).await;

    let mut last = harness.next_envelope(&mut subscription).await;
    for _ in 0..4 {
        last = harness.next_envelope(&mut subscription).await;
    }
    let stored = harness.get(meeting.id).await;
    assert_eq!(last.event_type, MeetingEventType::Stopped);
    assert_eq!(last.payload["rollups"]["total_cost"], stored.total_cost);
    assert_eq!(last.payload["rollups"]["total_duration_seconds"], 240);
    assert_eq!(last.payload["rollups"]["max_attendees"], 4);
    subscription.close().await;
}
