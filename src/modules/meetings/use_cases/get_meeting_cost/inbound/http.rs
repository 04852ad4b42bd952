use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::get_meeting_cost::query::GetMeetingCost;
use crate::shell::http::Actor;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path(meeting_id): Path<Uuid>,
) -> Response {
    let query = GetMeetingCost { meeting_id, actor_id };
    match state.get_meeting_cost.handle(&RequestContext::default(), query).await {
        Ok(cost) => Json(cost).into_response(),
        Err(error) => error.into_response(),
    }
}
