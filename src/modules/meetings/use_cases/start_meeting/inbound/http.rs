use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::start_meeting::command::StartMeeting;
use crate::shell::http::{Actor, request_origin};
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path(meeting_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let command = StartMeeting {
        meeting_id,
        actor_id,
        origin: request_origin(&headers),
    };
    match state.start_meeting.handle(&RequestContext::default(), command).await {
        Ok(view) => Json(view).into_response(),
        Err(error) => error.into_response(),
    }
}
