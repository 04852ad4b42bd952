// Lifecycle of a meeting, derived from its ledger row.
//
// Draft   -> created, never started
// Active  -> running, owns exactly one open increment
// Stopped -> terminal for this lifecycle
// Deleted -> tombstoned, accepts no transitions

use crate::modules::meetings::core::meeting::Meeting;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingState {
    Draft,
    Active,
    Stopped,
    Deleted,
}

impl MeetingState {
    pub fn of(meeting: &Meeting) -> Self {
        if meeting.is_deleted() {
            MeetingState::Deleted
        } else if meeting.is_active {
            MeetingState::Active
        } else if meeting.started_at.is_some() {
            MeetingState::Stopped
        } else {
            MeetingState::Draft
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingState::Draft => "draft",
            MeetingState::Active => "active",
            MeetingState::Stopped => "stopped",
            MeetingState::Deleted => "deleted",
        }
    }
}

/// Why a pure decision refused a command.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),
}
