// Pure decision for creating a meeting: a live meeting may not already own the
// external tuple.

use crate::modules::meetings::core::meeting::Meeting;
use crate::modules::meetings::core::state::Rejection;

pub fn decide_create(existing: Option<&Meeting>) -> Result<(), Rejection> {
    match existing {
        Some(meeting) => Err(Rejection::Conflict(format!(
            "external id already used by meeting {}",
            meeting.id
        ))),
        None => Ok(()),
    }
}
