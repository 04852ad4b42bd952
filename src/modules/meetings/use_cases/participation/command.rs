use uuid::Uuid;

use crate::modules::meetings::application::context::RequestOrigin;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinMeeting {
    pub meeting_id: Uuid,
    pub person_id: Uuid,
    pub actor_id: Uuid,
    pub origin: RequestOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveMeeting {
    pub meeting_id: Uuid,
    pub person_id: Uuid,
    pub actor_id: Uuid,
    pub origin: RequestOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParticipants {
    pub meeting_id: Uuid,
    pub actor_id: Uuid,
}
