// Membership intervals never overlap for one person: at most one interval per
// person and meeting is open at a time.

use uuid::Uuid;

use crate::modules::meetings::core::meeting::{Meeting, Participant};
use crate::modules::meetings::core::state::{MeetingState, Rejection};

pub fn decide_join(
    meeting: &Meeting,
    participants: &[Participant],
    person_id: Uuid,
) -> Result<(), Rejection> {
    match MeetingState::of(meeting) {
        MeetingState::Active => {}
        MeetingState::Deleted => return Err(Rejection::NotFound(format!("meeting {}", meeting.id))),
        MeetingState::Draft | MeetingState::Stopped => {
            return Err(Rejection::InvalidState("meeting is not active".into()));
        }
    }
    if participants.iter().any(|p| p.person_id == person_id && p.is_present()) {
        return Err(Rejection::Conflict(format!("person {person_id} already joined")));
    }
    Ok(())
}

/// Returns the open membership to close.
pub fn decide_leave<'a>(
    meeting: &Meeting,
    participants: &'a [Participant],
    person_id: Uuid,
) -> Result<&'a Participant, Rejection> {
    if meeting.is_deleted() {
        return Err(Rejection::NotFound(format!("meeting {}", meeting.id)));
    }
    participants
        .iter()
        .find(|p| p.person_id == person_id && p.is_present())
        .ok_or_else(|| Rejection::NotFound(format!("person {person_id} is not in the meeting")))
}
