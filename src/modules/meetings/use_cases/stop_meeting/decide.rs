use crate::modules::meetings::core::meeting::Meeting;
use crate::modules::meetings::core::state::{MeetingState, Rejection};

pub fn decide_stop(meeting: &Meeting) -> Result<(), Rejection> {
    match MeetingState::of(meeting) {
        MeetingState::Active => Ok(()),
        MeetingState::Draft | MeetingState::Stopped => {
            Err(Rejection::InvalidState("meeting is not active".into()))
        }
        MeetingState::Deleted => Err(Rejection::NotFound(format!("meeting {}", meeting.id))),
    }
}
