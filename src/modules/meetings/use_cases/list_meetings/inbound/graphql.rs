use async_graphql::{Context, ID, Object, Result as GqlResult, SimpleObject};
use chrono::{DateTime, Utc};

use crate::modules::meetings::adapters::outbound::ledger::{MeetingFilter, Page};
use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::list_meetings::query::{
    DEFAULT_PAGE_SIZE, ListMeetings, MeetingPage,
};
use crate::shell::graphql::{GqlMeeting, acting_as, parse_id, to_gql_error};
use crate::shell::state::AppState;

#[derive(SimpleObject)]
pub struct GqlMeetingPage {
    pub meetings: Vec<GqlMeeting>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl From<MeetingPage> for GqlMeetingPage {
    fn from(page: MeetingPage) -> Self {
        Self {
            meetings: page.meetings.into_iter().map(GqlMeeting::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
        }
    }
}

#[derive(Default)]
pub struct ListMeetingsQuery;

#[Object]
impl ListMeetingsQuery {
    #[allow(clippy::too_many_arguments)]
    async fn meetings(
        &self,
        context: &Context<'_>,
        org_id: ID,
        is_active: Option<bool>,
        started_after: Option<DateTime<Utc>>,
        started_before: Option<DateTime<Utc>>,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> GqlResult<GqlMeetingPage> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, _) = acting_as(context)?;
        let query = ListMeetings {
            org_id: parse_id(&org_id)?,
            actor_id,
            filter: MeetingFilter {
                is_active,
                started_after,
                started_before,
            },
            page: Page {
                page: page.unwrap_or(1),
                page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            },
        };
        let page = state
            .list_meetings
            .handle(&RequestContext::default(), query)
            .await
            .map_err(to_gql_error)?;
        Ok(page.into())
    }
}
