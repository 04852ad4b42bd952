use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::modules::meetings::use_cases::update_meeting::command::UpdateMeeting;
use crate::shared::core::clock::ManualClock;
use crate::shared::infrastructure::event_bus::BusSubscription;
use crate::tests::fixtures::harness::Harness;
use crate::tests::fixtures::meetings::fixed_now;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_updates_serialize_on_the_meeting() {
    let clock = Arc::new(ManualClock::ticking(fixed_now(), Duration::seconds(1)));
    let harness = Harness::with_clock(clock).await;
    let meeting = harness.active("planning").await;

    let count = UpdateMeeting::attendee_count(meeting.id, harness.actor_id, 3);
    let wage = UpdateMeeting::average_wage(meeting.id, harness.actor_id, 50.0);
    let (first, second) = {
        let context = harness.context();
        tokio::join!(
            harness.app.update_meeting.handle(&context, count),
            harness.app.update_meeting.handle(&context, wage),
        )
    };
    first.unwrap();
    second.unwrap();

    let rows = harness.ledger.increment_rows(meeting.id).await;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows.iter().filter(|i| i.is_open()).count(), 1);
    for pair in rows.windows(2) {
        assert_eq!(pair[0].stop_time, Some(pair[1].start_time));
        assert!(pair[0].elapsed_time > 0);
    }
    let tail = rows.last().unwrap();
    assert!(tail.is_open());
    assert_eq!((tail.attendee_count, tail.average_wage), (3, 50.0));
    assert_eq!(rows[1].running_total, rows[0].cost + rows[1].cost);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_writers_keep_a_single_open_tail() {
    let clock = Arc::new(ManualClock::ticking(fixed_now(), Duration::seconds(1)));
    let harness = Arc::new(Harness::with_clock(clock).await);
    let meeting = harness.active("planning").await;

    let writers: Vec<_> = (1..=8u32)
        .map(|count| {
            let harness = harness.clone();
            tokio::spawn(async move {
                let command = UpdateMeeting::attendee_count(meeting.id, harness.actor_id, count);
                harness.app.update_meeting.handle(&harness.context(), command).await
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    let rows = harness.ledger.increment_rows(meeting.id).await;
    assert_eq!(rows.len(), 9);
    assert_eq!(rows.iter().filter(|i| i.is_open()).count(), 1);
    assert!(rows.windows(2).all(|pair| pair[0].stop_time == Some(pair[1].start_time)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn events_leave_in_commit_order() {
    let clock = Arc::new(ManualClock::ticking(fixed_now(), Duration::seconds(1)));
    let harness = Arc::new(Harness::with_clock(clock).await);
    let meeting = harness.active("planning").await;
    let mut subscription = harness.subscribe(meeting.id).await;

    let writers: Vec<_> = (1..=8u32)
        .map(|count| {
            let harness = harness.clone();
            tokio::spawn(async move {
                let command = UpdateMeeting::attendee_count(meeting.id, harness.actor_id, count);
                harness.app.update_meeting.handle(&harness.context(), command).await
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    let mut starts = Vec::new();
    let mut last_count = None;
    for _ in 0..8 {
        let envelope = harness.next_envelope(&mut subscription).await;
        let increment = &envelope.payload["increment"];
        let start: DateTime<Utc> = increment["start_time"].as_str().unwrap().parse().unwrap();
        starts.push(start);
        last_count = increment["attendee_count"].as_u64();
    }
    assert!(starts.windows(2).all(|pair| pair[0] < pair[1]), "{starts:?}");

    let rows = harness.ledger.increment_rows(meeting.id).await;
    let tail = rows.last().unwrap();
    assert_eq!(starts.last(), Some(&tail.start_time));
    assert_eq!(last_count, Some(u64::from(tail.attendee_count)));
    subscription.close().await;
}
