use uuid::Uuid;

use crate::modules::meetings::application::context::RequestOrigin;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMeeting {
    pub org_id: Uuid,
    pub actor_id: Uuid,
    pub purpose: Option<String>,
    pub external_type: Option<String>,
    pub external_id: Option<String>,
    pub origin: RequestOrigin,
}

impl CreateMeeting {
    /// The deduplication tuple, present only when an external id is given.
    pub fn external(&self) -> Option<(String, String)> {
        match &self.external_id {
            Some(id) if !id.is_empty() => {
                Some((self.external_type.clone().unwrap_or_default(), id.clone()))
            }
            _ => None,
        }
    }
}
