// HTTP surface: route table, acting identity and error mapping shared by every
// use case's inbound adapter.

use axum::{
    Json, Router,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use uuid::Uuid;

use crate::modules::meetings::application::context::RequestOrigin;
use crate::modules::meetings::application::errors::MeetingError;
use crate::modules::meetings::use_cases::create_meeting::inbound::http as create_http;
use crate::modules::meetings::use_cases::delete_meeting::inbound::http as delete_http;
use crate::modules::meetings::use_cases::get_meeting::inbound::http as get_http;
use crate::modules::meetings::use_cases::get_meeting_cost::inbound::http as cost_http;
use crate::modules::meetings::use_cases::list_meetings::inbound::http as list_http;
use crate::modules::meetings::use_cases::participation::inbound::http as participation_http;
use crate::modules::meetings::use_cases::start_meeting::inbound::http as start_http;
use crate::modules::meetings::use_cases::stop_meeting::inbound::http as stop_http;
use crate::modules::meetings::use_cases::subscribe_to_meeting::inbound::http as events_http;
use crate::modules::meetings::use_cases::update_meeting::inbound::http as update_http;
use crate::shell::state::AppState;

/// Identity is resolved upstream; this header is where it is handed to us.
pub const ACTOR_HEADER: &str = "x-actor-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from(&parts.headers).map(Actor).ok_or_else(|| {
            let body = json!({
                "code": "UNAUTHENTICATED",
                "message": format!("missing or malformed {ACTOR_HEADER}"),
            });
            (StatusCode::UNAUTHORIZED, Json(body)).into_response()
        })
    }
}

pub fn actor_from(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
}

pub fn request_origin(headers: &HeaderMap) -> RequestOrigin {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    RequestOrigin {
        ip: header("x-forwarded-for")
            .and_then(|chain| chain.split(',').next())
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty()),
        user_agent: header("user-agent").map(str::to_string),
    }
}

pub fn status_of(error: &MeetingError) -> StatusCode {
    match error {
        MeetingError::NotFound(_) => StatusCode::NOT_FOUND,
        MeetingError::Forbidden { .. } => StatusCode::FORBIDDEN,
        MeetingError::InvalidState(_) | MeetingError::Conflict(_) => StatusCode::CONFLICT,
        MeetingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MeetingError::Cancelled => StatusCode::REQUEST_TIMEOUT,
        MeetingError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        MeetingError::Transient { .. } | MeetingError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for MeetingError {
    fn into_response(self) -> Response {
        let status = status_of(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, source = ?std::error::Error::source(&self), "request failed");
        }
        let body = json!({ "code": self.code(), "message": self.to_string() });
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/meetings", post(create_http::handle).get(list_http::handle))
        .route("/meetings/{id}", get(get_http::handle).delete(delete_http::handle))
        .route("/meetings/{id}/start", post(start_http::handle))
        .route("/meetings/{id}/stop", post(stop_http::handle))
        .route("/meetings/{id}/attendee-count", put(update_http::set_attendee_count))
        .route("/meetings/{id}/average-wage", put(update_http::set_average_wage))
        .route("/meetings/{id}/purpose", put(update_http::set_purpose))
        .route("/meetings/{id}/cost", get(cost_http::handle))
        .route("/meetings/{id}/participants", get(participation_http::list))
        .route(
            "/meetings/{id}/participants/{person_id}",
            put(participation_http::join).delete(participation_http::leave),
        )
        .route("/meetings/{id}/events", get(events_http::handle))
        .with_state(state)
}
