use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::update_meeting::command::UpdateMeeting;
use crate::shell::graphql::{GqlMeeting, acting_as, parse_id, to_gql_error};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct UpdateMeetingMutation;

#[Object]
impl UpdateMeetingMutation {
    async fn set_attendee_count(
        &self,
        context: &Context<'_>,
        id: ID,
        count: u32,
    ) -> GqlResult<GqlMeeting> {
        let (actor_id, origin) = acting_as(context)?;
        let command =
            UpdateMeeting::attendee_count(parse_id(&id)?, actor_id, count).with_origin(origin);
        run(context, command).await
    }

    async fn set_average_wage(
        &self,
        context: &Context<'_>,
        id: ID,
        wage: f64,
    ) -> GqlResult<GqlMeeting> {
        let (actor_id, origin) = acting_as(context)?;
        let command =
            UpdateMeeting::average_wage(parse_id(&id)?, actor_id, wage).with_origin(origin);
        run(context, command).await
    }

    async fn set_purpose(
        &self,
        context: &Context<'_>,
        id: ID,
        purpose: String,
    ) -> GqlResult<GqlMeeting> {
        let (actor_id, origin) = acting_as(context)?;
        let command = UpdateMeeting::purpose(parse_id(&id)?, actor_id, purpose).with_origin(origin);
        run(context, command).await
    }
}

async fn run(context: &Context<'_>, command: UpdateMeeting) -> GqlResult<GqlMeeting> {
    let state = context.data_unchecked::<AppState>();
    let view = state
        .update_meeting
        .handle(&RequestContext::default(), command)
        .await
        .map_err(to_gql_error)?;
    Ok(view.into())
}
