use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::participation::command::{
    JoinMeeting, LeaveMeeting, ListParticipants,
};
use crate::shell::http::{Actor, request_origin};
use crate::shell::state::AppState;

pub async fn join(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path((meeting_id, person_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Response {
    let command = JoinMeeting {
        meeting_id,
        person_id,
        actor_id,
        origin: request_origin(&headers),
    };
    match state.participation.join(&RequestContext::default(), command).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn leave(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path((meeting_id, person_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Response {
    let command = LeaveMeeting {
        meeting_id,
        person_id,
        actor_id,
        origin: request_origin(&headers),
    };
    match state.participation.leave(&RequestContext::default(), command).await {
        Ok(view) => Json(view).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path(meeting_id): Path<Uuid>,
) -> Response {
    let query = ListParticipants { meeting_id, actor_id };
    match state.participation.list(&RequestContext::default(), query).await {
        Ok(views) => Json(views).into_response(),
        Err(error) => error.into_response(),
    }
}
