// One parameter change per command: attendee count, average wage or purpose.

use uuid::Uuid;

use crate::modules::meetings::application::context::RequestOrigin;
use crate::modules::meetings::core::cycle::ParameterChange;
use crate::shared::core::primitives::Money;

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMeeting {
    pub meeting_id: Uuid,
    pub actor_id: Uuid,
    pub change: ParameterChange,
    pub origin: RequestOrigin,
}

impl UpdateMeeting {
    pub fn attendee_count(meeting_id: Uuid, actor_id: Uuid, count: u32) -> Self {
        Self::new(meeting_id, actor_id, ParameterChange::AttendeeCount(count))
    }

    pub fn average_wage(meeting_id: Uuid, actor_id: Uuid, wage: Money) -> Self {
        Self::new(meeting_id, actor_id, ParameterChange::AverageWage(wage))
    }

    pub fn purpose(meeting_id: Uuid, actor_id: Uuid, purpose: impl Into<String>) -> Self {
        Self::new(meeting_id, actor_id, ParameterChange::Purpose(purpose.into()))
    }

    pub fn with_origin(mut self, origin: RequestOrigin) -> Self {
        self.origin = origin;
        self
    }

    fn new(meeting_id: Uuid, actor_id: Uuid, change: ParameterChange) -> Self {
        Self {
            meeting_id,
            actor_id,
            change,
            origin: RequestOrigin::default(),
        }
    }
}
