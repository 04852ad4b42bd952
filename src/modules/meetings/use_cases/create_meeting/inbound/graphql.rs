use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::create_meeting::command::CreateMeeting;
use crate::shell::graphql::{GqlMeeting, acting_as, parse_id, to_gql_error};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct CreateMeetingMutation;

#[Object]
impl CreateMeetingMutation {
    async fn create_meeting(
        &self,
        context: &Context<'_>,
        org_id: ID,
        purpose: Option<String>,
        external_type: Option<String>,
        external_id: Option<String>,
    ) -> GqlResult<GqlMeeting> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, origin) = acting_as(context)?;

        let command = CreateMeeting {
            org_id: parse_id(&org_id)?,
            actor_id,
            purpose,
            external_type,
            external_id,
            origin,
        };

        let view = state
            .create_meeting
            .handle(&RequestContext::default(), command)
            .await
            .map_err(to_gql_error)?;
        Ok(view.into())
    }
}
