use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::participation::command::{
    JoinMeeting, LeaveMeeting, ListParticipants,
};
use crate::shell::graphql::{GqlParticipant, acting_as, parse_id, to_gql_error};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct ParticipationQuery;

#[Object]
impl ParticipationQuery {
    async fn participants(
        &self,
        context: &Context<'_>,
        meeting_id: ID,
    ) -> GqlResult<Vec<GqlParticipant>> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, _) = acting_as(context)?;
        let query = ListParticipants {
            meeting_id: parse_id(&meeting_id)?,
            actor_id,
        };
        let views = state
            .participation
            .list(&RequestContext::default(), query)
            .await
            .map_err(to_gql_error)?;
        Ok(views.into_iter().map(GqlParticipant::from).collect())
    }
}

#[derive(Default)]
pub struct ParticipationMutation;

#[Object]
impl ParticipationMutation {
    async fn join_meeting(
        &self,
        context: &Context<'_>,
        meeting_id: ID,
        person_id: ID,
    ) -> GqlResult<GqlParticipant> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, origin) = acting_as(context)?;
        let command = JoinMeeting {
            meeting_id: parse_id(&meeting_id)?,
            person_id: parse_id(&person_id)?,
            actor_id,
            origin,
        };
        let view = state
            .participation
            .join(&RequestContext::default(), command)
            .await
            .map_err(to_gql_error)?;
        Ok(view.into())
    }

    async fn leave_meeting(
        &self,
        context: &Context<'_>,
        meeting_id: ID,
        person_id: ID,
    ) -> GqlResult<GqlParticipant> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, origin) = acting_as(context)?;
        let command = LeaveMeeting {
            meeting_id: parse_id(&meeting_id)?,
            person_id: parse_id(&person_id)?,
            actor_id,
            origin,
        };
        let view = state
            .participation
            .leave(&RequestContext::default(), command)
            .await
            .map_err(to_gql_error)?;
        Ok(view.into())
    }
}
