// Increment cycling: close the open tail and open its successor with one field changed.
//
// Invariants kept
// - The successor starts exactly where the closed increment stops.
// - A change at or before the tail's start instant is folded into the tail
//   instead of persisting a zero-length slice.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::meetings::core::cost::{elapsed_seconds, slice_cost};
use crate::modules::meetings::core::events::MeetingEventType;
use crate::modules::meetings::core::meeting::{Increment, Meeting};
use crate::shared::core::primitives::{Money, round_money};

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterChange {
    AttendeeCount(u32),
    AverageWage(Money),
    Purpose(String),
}

impl ParameterChange {
    pub fn apply_to(&self, increment: &mut Increment) {
        match self {
            ParameterChange::AttendeeCount(count) => increment.attendee_count = *count,
            ParameterChange::AverageWage(wage) => increment.average_wage = *wage,
            ParameterChange::Purpose(purpose) => increment.purpose = purpose.clone(),
        }
    }

    pub fn event_type(&self) -> MeetingEventType {
        match self {
            ParameterChange::AttendeeCount(_) => MeetingEventType::AttendeeCount,
            ParameterChange::AverageWage(_) => MeetingEventType::AverageWage,
            ParameterChange::Purpose(_) => MeetingEventType::Cost,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParameterChange::AttendeeCount(_) => "attendee_count",
            ParameterChange::AverageWage(_) => "average_wage",
            ParameterChange::Purpose(_) => "purpose",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The change landed on the existing tail; nothing was closed.
    Coalesced { tail: Increment },
    /// The tail was closed at the cycle instant and a successor opened there.
    Cycled { closed: Increment, opened: Increment },
}

impl CycleOutcome {
    pub fn open_tail(&self) -> &Increment {
        match self {
            CycleOutcome::Coalesced { tail } => tail,
            CycleOutcome::Cycled { opened, .. } => opened,
        }
    }
}

pub fn open_increment(
    id: Uuid,
    meeting: &Meeting,
    at: DateTime<Utc>,
    attendee_count: u32,
    average_wage: Money,
) -> Increment {
    Increment {
        id,
        meeting_id: meeting.id,
        start_time: at,
        stop_time: None,
        attendee_count,
        average_wage,
        purpose: meeting.purpose.clone(),
        elapsed_time: 0,
        cost: 0.0,
        running_total: 0.0,
        created_at: at,
        updated_at: at,
    }
}

/// Materializes stop time, elapsed seconds and cost on a tail. Callers ensure `at` is
/// strictly after the tail's start.
pub fn close_increment(tail: &Increment, at: DateTime<Utc>) -> Increment {
    let elapsed = elapsed_seconds(tail.start_time, at);
    Increment {
        stop_time: Some(at),
        elapsed_time: elapsed,
        cost: round_money(slice_cost(elapsed, tail.attendee_count, tail.average_wage)),
        updated_at: at,
        ..tail.clone()
    }
}

pub fn cycle_increment(
    tail: &Increment,
    now: DateTime<Utc>,
    change: &ParameterChange,
    successor_id: Uuid,
) -> CycleOutcome {
    if now <= tail.start_time {
        let mut tail = tail.clone();
        change.apply_to(&mut tail);
        tail.updated_at = now.max(tail.updated_at);
        return CycleOutcome::Coalesced { tail };
    }

    let closed = close_increment(tail, now);
    let mut opened = Increment {
        id: successor_id,
        start_time: now,
        stop_time: None,
        elapsed_time: 0,
        cost: 0.0,
        running_total: 0.0,
        created_at: now,
        updated_at: now,
        ..tail.clone()
    };
    change.apply_to(&mut opened);
    CycleOutcome::Cycled { closed, opened }
}
