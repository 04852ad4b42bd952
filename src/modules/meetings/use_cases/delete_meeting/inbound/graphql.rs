use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::delete_meeting::command::DeleteMeeting;
use crate::shell::graphql::{acting_as, parse_id, to_gql_error};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct DeleteMeetingMutation;

#[Object]
impl DeleteMeetingMutation {
    async fn delete_meeting(&self, context: &Context<'_>, id: ID) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, origin) = acting_as(context)?;
        let command = DeleteMeeting {
            meeting_id: parse_id(&id)?,
            actor_id,
            origin,
        };
        state
            .delete_meeting
            .handle(&RequestContext::default(), command)
            .await
            .map_err(to_gql_error)?;
        Ok(true)
    }
}
