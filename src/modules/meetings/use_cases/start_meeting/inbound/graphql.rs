use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::start_meeting::command::StartMeeting;
use crate::shell::graphql::{GqlMeeting, acting_as, parse_id, to_gql_error};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct StartMeetingMutation;

#[Object]
impl StartMeetingMutation {
    async fn start_meeting(&self, context: &Context<'_>, id: ID) -> GqlResult<GqlMeeting> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, origin) = acting_as(context)?;
        let command = StartMeeting {
            meeting_id: parse_id(&id)?,
            actor_id,
            origin,
        };
        let view = state
            .start_meeting
            .handle(&RequestContext::default(), command)
            .await
            .map_err(to_gql_error)?;
        Ok(view.into())
    }
}
