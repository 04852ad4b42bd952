use serde::Serialize;
use uuid::Uuid;

use crate::modules::meetings::adapters::outbound::ledger::{MeetingFilter, Page};
use crate::modules::meetings::core::views::MeetingView;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMeetings {
    pub org_id: Uuid,
    pub actor_id: Uuid,
    pub filter: MeetingFilter,
    pub page: Page,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingPage {
    pub meetings: Vec<MeetingView>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}
