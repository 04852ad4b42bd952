use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::delete_meeting::command::DeleteMeeting;
use crate::shell::http::{Actor, request_origin};
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path(meeting_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let command = DeleteMeeting {
        meeting_id,
        actor_id,
        origin: request_origin(&headers),
    };
    match state.delete_meeting.handle(&RequestContext::default(), command).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}
