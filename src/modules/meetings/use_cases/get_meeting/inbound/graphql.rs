use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::get_meeting::query::GetMeeting;
use crate::shell::graphql::{GqlMeeting, acting_as, parse_id, to_gql_error};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct GetMeetingQuery;

#[Object]
impl GetMeetingQuery {
    async fn meeting(&self, context: &Context<'_>, id: ID) -> GqlResult<GqlMeeting> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, _) = acting_as(context)?;
        let query = GetMeeting {
            meeting_id: parse_id(&id)?,
            actor_id,
        };
        let view = state
            .get_meeting
            .handle(&RequestContext::default(), query)
            .await
            .map_err(to_gql_error)?;
        Ok(view.into())
    }
}
