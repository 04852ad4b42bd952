use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::create_meeting::command::CreateMeeting;
use crate::shell::http::{Actor, request_origin};
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct CreateMeetingBody {
    pub org_id: Uuid,
    pub purpose: Option<String>,
    pub external_type: Option<String>,
    pub external_id: Option<String>,
}

pub async fn handle(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    headers: HeaderMap,
    body: Result<Json<CreateMeetingBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = CreateMeeting {
        org_id: body.org_id,
        actor_id,
        purpose: body.purpose,
        external_type: body.external_type,
        external_id: body.external_id,
        origin: request_origin(&headers),
    };

    match state.create_meeting.handle(&RequestContext::default(), command).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}
