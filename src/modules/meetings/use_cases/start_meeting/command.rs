use uuid::Uuid;

use crate::modules::meetings::application::context::RequestOrigin;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartMeeting {
    pub meeting_id: Uuid,
    pub actor_id: Uuid,
    pub origin: RequestOrigin,
}
