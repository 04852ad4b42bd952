use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::stop_meeting::command::StopMeeting;
use crate::shell::http::{Actor, request_origin};
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path(meeting_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let command = StopMeeting {
        meeting_id,
        actor_id,
        origin: request_origin(&headers),
    };
    match state.stop_meeting.handle(&RequestContext::default(), command).await {
        Ok(view) => Json(view).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod stop_meeting_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    use crate::shell::http::ACTOR_HEADER;
    use crate::tests::fixtures::harness::{Harness, before_each};

    use super::handle;

    fn app(harness: &Harness) -> Router {
        Router::new()
            .route("/meetings/{id}/stop", post(handle))
            .with_state(harness.app.clone())
    }

    fn stop(harness: &Harness, meeting_id: uuid::Uuid) -> Request<Body> {
        Request::post(format!("/meetings/{meeting_id}/stop"))
            .header(ACTOR_HEADER, harness.actor_id.to_string())
            .body(Body::empty())
            .unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_200_with_rollups(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let active = harness.active("planning").await;
        harness.clock.advance(chrono::Duration::seconds(30));

        let response = app(&harness).oneshot(stop(&harness, active.id)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["is_active"], false);
        assert_eq!(json["total_duration_seconds"], 30);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_409_for_a_draft(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let draft = harness.draft("planning").await;
        let response = app(&harness).oneshot(stop(&harness, draft.id)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
