use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::get_meeting_cost::query::GetMeetingCost;
use crate::shell::graphql::{GqlCost, acting_as, parse_id, to_gql_error};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct GetMeetingCostQuery;

#[Object]
impl GetMeetingCostQuery {
    async fn meeting_cost(&self, context: &Context<'_>, id: ID) -> GqlResult<GqlCost> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, _) = acting_as(context)?;
        let query = GetMeetingCost {
            meeting_id: parse_id(&id)?,
            actor_id,
        };
        let cost = state
            .get_meeting_cost
            .handle(&RequestContext::default(), query)
            .await
            .map_err(to_gql_error)?;
        Ok(cost.into())
    }
}
