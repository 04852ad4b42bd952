// Pure decision for starting a meeting. Only a draft may start.

use crate::modules::meetings::core::meeting::Meeting;
use crate::modules::meetings::core::state::{MeetingState, Rejection};

pub fn decide_start(meeting: &Meeting) -> Result<(), Rejection> {
    match MeetingState::of(meeting) {
        MeetingState::Draft => Ok(()),
        MeetingState::Active => Err(Rejection::InvalidState("meeting is already active".into())),
        MeetingState::Stopped => Err(Rejection::InvalidState(
            "meeting has already been stopped".into(),
        )),
        MeetingState::Deleted => Err(Rejection::NotFound(format!("meeting {}", meeting.id))),
    }
}
