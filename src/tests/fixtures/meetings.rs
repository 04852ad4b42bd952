// Ledger records in each lifecycle state, for pure decision tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::modules::meetings::core::meeting::{Meeting, Participant};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub struct MeetingBuilder {
    inner: Meeting,
}

impl Default for MeetingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl MeetingBuilder {
    pub fn new() -> Self {
        Self {
            inner: Meeting::draft(
                Uuid::now_v7(),
                Uuid::now_v7(),
                Uuid::now_v7(),
                "standup".into(),
                None,
                fixed_now(),
            ),
        }
    }

    pub fn org(mut self, org_id: Uuid) -> Self {
        self.inner.org_id = org_id;
        self
    }

    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.inner.purpose = purpose.into();
        self
    }

    pub fn external(mut self, kind: impl Into<String>, id: impl Into<String>) -> Self {
        self.inner.external_type = Some(kind.into());
        self.inner.external_id = Some(id.into());
        self
    }

    pub fn active(mut self) -> Self {
        self.inner.is_active = true;
        self.inner.started_at = Some(fixed_now());
        self.inner.stopped_at = None;
        self
    }

    pub fn stopped(mut self) -> Self {
        self.inner.is_active = false;
        self.inner.started_at = Some(fixed_now());
        self.inner.stopped_at = Some(fixed_now() + Duration::seconds(60));
        self
    }

    pub fn deleted(mut self) -> Self {
        self.inner.deleted_at = Some(fixed_now() + Duration::seconds(120));
        self
    }

    pub fn build(self) -> Meeting {
        self.inner
    }
}

/// A membership of `person_id`, closed a minute after joining when `left` is set.
pub fn participant(meeting: &Meeting, person_id: Uuid, left: bool) -> Participant {
    let joined_at = fixed_now();
    Participant {
        id: Uuid::now_v7(),
        meeting_id: meeting.id,
        person_id,
        joined_at,
        left_at: left.then(|| joined_at + Duration::seconds(60)),
        created_at: joined_at,
        updated_at: joined_at,
    }
}
