use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetMeetingCost {
    pub meeting_id: Uuid,
    pub actor_id: Uuid,
}
