// Ledger store port: durable, transactional storage of meetings, increments and participants.
//
// Concurrency
// - `lock_meeting` takes an exclusive lock on the meeting row that lives until the
//   transaction commits or rolls back. Mutations of one meeting therefore serialize.
// - Commit rejects states with two open increments for one meeting.
// - Dropping a transaction without committing rolls it back.
//
// Reads outside a transaction observe committed state only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::modules::meetings::core::meeting::{Increment, Meeting, Participant};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("transient ledger failure: {0}")]
    Transient(String),

    #[error("ledger invariant violated: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingFilter {
    pub is_active: Option<bool>,
    pub started_after: Option<DateTime<Utc>>,
    pub started_before: Option<DateTime<Utc>>,
}

impl MeetingFilter {
    pub fn matches(&self, meeting: &Meeting) -> bool {
        if self.is_active.is_some_and(|active| active != meeting.is_active) {
            return false;
        }
        if let Some(after) = self.started_after {
            if !meeting.started_at.is_some_and(|started| started > after) {
                return false;
            }
        }
        if let Some(before) = self.started_before {
            if !meeting.started_at.is_some_and(|started| started < before) {
                return false;
            }
        }
        true
    }
}

/// One-based page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Page {
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.page_size as usize
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>, LedgerError>;

    async fn get_meeting(&self, id: Uuid) -> Result<Meeting, LedgerError>;
    async fn list_increments(&self, meeting_id: Uuid) -> Result<Vec<Increment>, LedgerError>;
    async fn list_participants(&self, meeting_id: Uuid) -> Result<Vec<Participant>, LedgerError>;

    /// Meeting and increments read from one committed state.
    async fn get_meeting_with_increments(
        &self,
        meeting_id: Uuid,
    ) -> Result<(Meeting, Vec<Increment>), LedgerError>;

    /// Newest first. Returns the page and the total number of matches.
    async fn list_meetings(
        &self,
        org_id: Uuid,
        filter: &MeetingFilter,
        page: Page,
    ) -> Result<(Vec<Meeting>, u64), LedgerError>;
}

#[async_trait]
pub trait LedgerTransaction: Send {
    async fn lock_meeting(&mut self, id: Uuid) -> Result<Meeting, LedgerError>;
    async fn get_meeting(&mut self, id: Uuid) -> Result<Meeting, LedgerError>;
    async fn insert_meeting(&mut self, meeting: &Meeting) -> Result<(), LedgerError>;
    async fn update_meeting(&mut self, meeting: &Meeting) -> Result<(), LedgerError>;
    async fn soft_delete_meeting(&mut self, id: Uuid, at: DateTime<Utc>) -> Result<(), LedgerError>;
    async fn lookup_by_external(
        &mut self,
        external_type: &str,
        external_id: &str,
    ) -> Result<Option<Meeting>, LedgerError>;

    /// The unique open increment of the meeting, if any.
    async fn list_open_increment(
        &mut self,
        meeting_id: Uuid,
    ) -> Result<Option<Increment>, LedgerError>;
    async fn insert_increment(&mut self, increment: &Increment) -> Result<(), LedgerError>;
    async fn update_increment(&mut self, increment: &Increment) -> Result<(), LedgerError>;
    /// Removes a never-closed increment that would otherwise be persisted with zero length.
    async fn delete_increment(&mut self, increment_id: Uuid) -> Result<(), LedgerError>;
    /// Ordered by start time.
    async fn list_increments(&mut self, meeting_id: Uuid) -> Result<Vec<Increment>, LedgerError>;

    async fn insert_participant(&mut self, participant: &Participant) -> Result<(), LedgerError>;
    async fn update_participant(&mut self, participant: &Participant) -> Result<(), LedgerError>;
    async fn list_participants(
        &mut self,
        meeting_id: Uuid,
    ) -> Result<Vec<Participant>, LedgerError>;

    async fn commit(self: Box<Self>) -> Result<(), LedgerError>;
    async fn rollback(self: Box<Self>) -> Result<(), LedgerError>;
}

#[cfg(test)]
mod ledger_port_tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    fn t(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(seconds)
    }

    #[fixture]
    fn started() -> Meeting {
        let mut meeting = Meeting::draft(
            Uuid::now_v7(),
            Uuid::now_v7(),
            Uuid::now_v7(),
            "standup".into(),
            None,
            t(0),
        );
        meeting.is_active = true;
        meeting.started_at = Some(t(100));
        meeting
    }

    #[rstest]
    #[case(MeetingFilter::default(), true)]
    #[case(MeetingFilter { is_active: Some(true), ..Default::default() }, true)]
    #[case(MeetingFilter { is_active: Some(false), ..Default::default() }, false)]
    #[case(MeetingFilter { started_after: Some(t(50)), ..Default::default() }, true)]
    #[case(MeetingFilter { started_after: Some(t(100)), ..Default::default() }, false)]
    #[case(MeetingFilter { started_before: Some(t(101)), ..Default::default() }, true)]
    #[case(MeetingFilter { started_before: Some(t(100)), ..Default::default() }, false)]
    fn it_should_filter_meetings(
        started: Meeting,
        #[case] filter: MeetingFilter,
        #[case] expected: bool,
    ) {
        assert_eq!(filter.matches(&started), expected);
    }

    #[rstest]
    fn it_should_exclude_drafts_from_started_windows(mut started: Meeting) {
        started.started_at = None;
        let filter = MeetingFilter {
            started_after: Some(t(0)),
            ..Default::default()
        };
        assert!(!filter.matches(&started));
    }

    #[rstest]
    #[case(Page { page: 1, page_size: 20 }, 0)]
    #[case(Page { page: 3, page_size: 20 }, 40)]
    #[case(Page { page: 0, page_size: 20 }, 0)]
    fn it_should_compute_page_offsets(#[case] page: Page, #[case] expected: usize) {
        assert_eq!(page.offset(), expected);
    }
}
