use uuid::Uuid;

use crate::modules::meetings::application::context::RequestOrigin;
use crate::modules::meetings::use_cases::create_meeting::command::CreateMeeting;

pub struct CreateMeetingBuilder {
    inner: CreateMeeting,
}

impl Default for CreateMeetingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CreateMeetingBuilder {
    pub fn new() -> Self {
        Self {
            inner: CreateMeeting {
                org_id: Uuid::now_v7(),
                actor_id: Uuid::now_v7(),
                purpose: None,
                external_type: None,
                external_id: None,
                origin: RequestOrigin::default(),
            },
        }
    }

    pub fn org(mut self, org_id: Uuid) -> Self {
        self.inner.org_id = org_id;
        self
    }

    pub fn actor(mut self, actor_id: Uuid) -> Self {
        self.inner.actor_id = actor_id;
        self
    }

    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.inner.purpose = Some(purpose.into());
        self
    }

    pub fn external(mut self, kind: impl Into<String>, id: impl Into<String>) -> Self {
        self.inner.external_type = Some(kind.into());
        self.inner.external_id = Some(id.into());
        self
    }

    pub fn build(self) -> CreateMeeting {
        self.inner
    }
}
