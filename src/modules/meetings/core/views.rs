// Read shapes returned to callers of the meeting engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::meetings::core::cost::CostSummary;
use crate::modules::meetings::core::meeting::{Meeting, Participant};
use crate::shared::core::primitives::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingView {
    pub id: Uuid,
    pub org_id: Uuid,
    pub purpose: String,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub total_cost: Money,
    pub total_duration_seconds: i64,
    pub max_attendees: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&Meeting> for MeetingView {
    fn from(meeting: &Meeting) -> Self {
        Self {
            id: meeting.id,
            org_id: meeting.org_id,
            purpose: meeting.purpose.clone(),
            started_at: meeting.started_at,
            stopped_at: meeting.stopped_at,
            is_active: meeting.is_active,
            total_cost: meeting.total_cost_cached,
            total_duration_seconds: meeting.total_duration_cached,
            max_attendees: meeting.max_attendees_cached,
            created_at: meeting.created_at,
        }
    }
}

pub type CostView = CostSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub person_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

impl From<&Participant> for ParticipantView {
    fn from(participant: &Participant) -> Self {
        Self {
            person_id: participant.person_id,
            joined_at: participant.joined_at,
            left_at: participant.left_at,
        }
    }
}
