use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::update_meeting::command::UpdateMeeting;
use crate::shared::core::primitives::Money;
use crate::shell::http::{Actor, request_origin};
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct AttendeeCountBody {
    pub count: u32,
}

#[derive(Deserialize)]
pub struct AverageWageBody {
    pub wage: Money,
}

#[derive(Deserialize)]
pub struct PurposeBody {
    pub purpose: String,
}

pub async fn set_attendee_count(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path(meeting_id): Path<Uuid>,
    headers: HeaderMap,
    body: Result<Json<AttendeeCountBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let command = UpdateMeeting::attendee_count(meeting_id, actor_id, body.count)
        .with_origin(request_origin(&headers));
    run(&state, command).await
}

pub async fn set_average_wage(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path(meeting_id): Path<Uuid>,
    headers: HeaderMap,
    body: Result<Json<AverageWageBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let command = UpdateMeeting::average_wage(meeting_id, actor_id, body.wage)
        .with_origin(request_origin(&headers));
    run(&state, command).await
}

pub async fn set_purpose(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path(meeting_id): Path<Uuid>,
    headers: HeaderMap,
    body: Result<Json<PurposeBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let command = UpdateMeeting::purpose(meeting_id, actor_id, body.purpose)
        .with_origin(request_origin(&headers));
    run(&state, command).await
}

async fn run(state: &AppState, command: UpdateMeeting) -> Response {
    match state.update_meeting.handle(&RequestContext::default(), command).await {
        Ok(view) => Json(view).into_response(),
        Err(error) => error.into_response(),
    }
}
