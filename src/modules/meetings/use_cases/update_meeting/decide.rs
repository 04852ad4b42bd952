// Pure decision for a parameter change.
//
// - Active meetings cycle their increment.
// - Drafts accept a purpose change on the meeting row only.
// - Everything else is an invalid transition.

use crate::modules::meetings::core::cycle::ParameterChange;
use crate::modules::meetings::core::meeting::Meeting;
use crate::modules::meetings::core::state::{MeetingState, Rejection};
use crate::shared::core::primitives::checked_amount;

#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePlan {
    Cycle(ParameterChange),
    RenameDraft(String),
}

pub fn decide_update(meeting: &Meeting, change: &ParameterChange) -> Result<UpdatePlan, Rejection> {
    let state = MeetingState::of(meeting);
    match (state, change) {
        (MeetingState::Deleted, _) => {
            return Err(Rejection::NotFound(format!("meeting {}", meeting.id)));
        }
        (MeetingState::Active, _) | (MeetingState::Draft, ParameterChange::Purpose(_)) => {}
        _ => return Err(Rejection::InvalidState("meeting is not active".into())),
    }

    let change = validate(change)?;
    match (state, change) {
        (MeetingState::Draft, ParameterChange::Purpose(purpose)) => {
            Ok(UpdatePlan::RenameDraft(purpose))
        }
        (_, change) => Ok(UpdatePlan::Cycle(change)),
    }
}

fn validate(change: &ParameterChange) -> Result<ParameterChange, Rejection> {
    match change {
        ParameterChange::AttendeeCount(count) => Ok(ParameterChange::AttendeeCount(*count)),
        ParameterChange::AverageWage(wage) => checked_amount(*wage)
            .map(ParameterChange::AverageWage)
            .ok_or_else(|| {
                Rejection::Validation("average wage must be a non-negative amount".into())
            }),
        ParameterChange::Purpose(purpose) if purpose.trim().is_empty() => {
            Err(Rejection::Validation("purpose must not be empty".into()))
        }
        ParameterChange::Purpose(purpose) => {
            Ok(ParameterChange::Purpose(purpose.trim().to_string()))
        }
    }
}
