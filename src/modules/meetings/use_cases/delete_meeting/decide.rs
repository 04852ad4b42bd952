use crate::modules::meetings::core::meeting::Meeting;
use crate::modules::meetings::core::state::{MeetingState, Rejection};

/// What a delete has to do before the row is tombstoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePlan {
    Tombstone,
    /// The meeting is still running: close its tail and roll up first.
    StopThenTombstone,
}

pub fn decide_delete(meeting: &Meeting) -> Result<DeletePlan, Rejection> {
    match MeetingState::of(meeting) {
        MeetingState::Active => Ok(DeletePlan::StopThenTombstone),
        MeetingState::Draft | MeetingState::Stopped => Ok(DeletePlan::Tombstone),
        MeetingState::Deleted => Err(Rejection::NotFound(format!("meeting {}", meeting.id))),
    }
}
