use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::stop_meeting::command::StopMeeting;
use crate::shell::graphql::{GqlMeeting, acting_as, parse_id, to_gql_error};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct StopMeetingMutation;

#[Object]
impl StopMeetingMutation {
    async fn stop_meeting(&self, context: &Context<'_>, id: ID) -> GqlResult<GqlMeeting> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, origin) = acting_as(context)?;
        let command = StopMeeting {
            meeting_id: parse_id(&id)?,
            actor_id,
            origin,
        };
        let view = state
            .stop_meeting
            .handle(&RequestContext::default(), command)
            .await
            .map_err(to_gql_error)?;
        Ok(view.into())
    }
}
