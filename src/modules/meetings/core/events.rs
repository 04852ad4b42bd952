// Events published on a meeting's topic after a successful commit.
//
// Wire shape
// - { "type": "meeting:<kind>", "meeting_id": <uuid>, "payload": <json> }
// - Payloads are additive; subscribers ignore fields they do not know.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::meetings::core::meeting::{Increment, Meeting, Participant};
use crate::shared::core::primitives::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingEventType {
    #[serde(rename = "meeting:started")]
    Started,
    #[serde(rename = "meeting:stopped")]
    Stopped,
    #[serde(rename = "meeting:attendee_count")]
    AttendeeCount,
    #[serde(rename = "meeting:average_wage")]
    AverageWage,
    #[serde(rename = "meeting:cost")]
    Cost,
    #[serde(rename = "meeting:participant")]
    Participant,
}

impl MeetingEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingEventType::Started => "meeting:started",
            MeetingEventType::Stopped => "meeting:stopped",
            MeetingEventType::AttendeeCount => "meeting:attendee_count",
            MeetingEventType::AverageWage => "meeting:average_wage",
            MeetingEventType::Cost => "meeting:cost",
            MeetingEventType::Participant => "meeting:participant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub event_type: MeetingEventType,
    pub meeting_id: Uuid,
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementSnapshot {
    pub increment_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub attendee_count: u32,
    pub average_wage: Money,
    pub purpose: String,
}

impl From<&Increment> for IncrementSnapshot {
    fn from(increment: &Increment) -> Self {
        Self {
            increment_id: increment.id,
            start_time: increment.start_time,
            attendee_count: increment.attendee_count,
            average_wage: increment.average_wage,
            purpose: increment.purpose.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupSnapshot {
    pub total_cost: Money,
    pub total_duration_seconds: i64,
    pub max_attendees: u32,
}

impl From<&Meeting> for RollupSnapshot {
    fn from(meeting: &Meeting) -> Self {
        Self {
            total_cost: meeting.total_cost_cached,
            total_duration_seconds: meeting.total_duration_cached,
            max_attendees: meeting.max_attendees_cached,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantAction {
    Joined,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeetingEvent {
    Started {
        started_at: DateTime<Utc>,
        increment: IncrementSnapshot,
    },
    Stopped {
        stopped_at: DateTime<Utc>,
        rollups: RollupSnapshot,
    },
    ParameterChanged {
        #[serde(skip)]
        event_type: MeetingEventType,
        increment: IncrementSnapshot,
        rollups: RollupSnapshot,
    },
    Participant {
        action: ParticipantAction,
        person_id: Uuid,
        at: DateTime<Utc>,
    },
}

impl MeetingEvent {
    pub fn event_type(&self) -> MeetingEventType {
        match self {
            MeetingEvent::Started { .. } => MeetingEventType::Started,
            MeetingEvent::Stopped { .. } => MeetingEventType::Stopped,
            MeetingEvent::ParameterChanged { event_type, .. } => *event_type,
            MeetingEvent::Participant { .. } => MeetingEventType::Participant,
        }
    }

    pub fn into_envelope(self, meeting_id: Uuid) -> Result<EventEnvelope, serde_json::Error> {
        Ok(EventEnvelope {
            event_type: self.event_type(),
            meeting_id,
            payload: serde_json::to_value(&self)?,
        })
    }

    pub fn participant(participant: &Participant, action: ParticipantAction) -> Self {
        let at = match action {
            ParticipantAction::Joined => participant.joined_at,
            ParticipantAction::Left => participant.left_at.unwrap_or(participant.updated_at),
        };
        MeetingEvent::Participant {
            action,
            person_id: participant.person_id,
            at,
        }
    }
}
