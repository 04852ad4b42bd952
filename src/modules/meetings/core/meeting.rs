// Ledger records of the meetings context: meetings, their increments and participants.
//
// Boundaries
// - Plain data plus small accessors. No input or output.
//
// Timestamps
// - All instants are UTC and come from the injected Clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::core::primitives::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Uuid,
    pub org_id: Uuid,
    pub created_by: Uuid,
    pub purpose: String,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub total_cost_cached: Money,
    pub total_duration_cached: i64,
    pub max_attendees_cached: u32,
    pub external_type: Option<String>,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Meeting {
    pub fn draft(
        id: Uuid,
        org_id: Uuid,
        created_by: Uuid,
        purpose: String,
        external: Option<(String, String)>,
        now: DateTime<Utc>,
    ) -> Self {
        let (external_type, external_id) = match external {
            Some((kind, id)) => (Some(kind), Some(id)),
            None => (None, None),
        };
        Self {
            id,
            org_id,
            created_by,
            purpose,
            started_at: None,
            stopped_at: None,
            is_active: false,
            total_cost_cached: 0.0,
            total_duration_cached: 0,
            max_attendees_cached: 0,
            external_type,
            external_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// The deduplication tuple, present only when an external id is set.
    pub fn external_key(&self) -> Option<(&str, &str)> {
        match (&self.external_type, &self.external_id) {
            (Some(kind), Some(id)) if !id.is_empty() => Some((kind.as_str(), id.as_str())),
            (None, Some(id)) if !id.is_empty() => Some(("", id.as_str())),
            _ => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Increment {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub stop_time: Option<DateTime<Utc>>,
    pub attendee_count: u32,
    pub average_wage: Money,
    pub purpose: String,
    pub elapsed_time: i64,
    pub cost: Money,
    pub running_total: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Increment {
    pub fn is_open(&self) -> bool {
        self.stop_time.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub person_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    pub fn is_present(&self) -> bool {
        self.left_at.is_none()
    }
}
