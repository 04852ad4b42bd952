use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::meetings::adapters::outbound::ledger::{MeetingFilter, Page};
use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::list_meetings::query::{DEFAULT_PAGE_SIZE, ListMeetings};
use crate::shell::http::Actor;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct ListMeetingsParams {
    pub org_id: Uuid,
    pub is_active: Option<bool>,
    pub started_after: Option<DateTime<Utc>>,
    pub started_before: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub async fn handle(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    params: Result<Query<ListMeetingsParams>, QueryRejection>,
) -> Response {
    let Ok(Query(params)) = params else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let query = ListMeetings {
        org_id: params.org_id,
        actor_id,
        filter: MeetingFilter {
            is_active: params.is_active,
            started_after: params.started_after,
            started_before: params.started_before,
        },
        page: Page {
            page: params.page.unwrap_or(1),
            page_size: params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        },
    };
    match state.list_meetings.handle(&RequestContext::default(), query).await {
        Ok(page) => Json(page).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod list_meetings_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    use crate::shell::http::ACTOR_HEADER;
    use crate::tests::fixtures::harness::{Harness, before_each};

    use super::handle;

    fn app(harness: &Harness) -> Router {
        Router::new()
            .route("/meetings", get(handle))
            .with_state(harness.app.clone())
    }

    fn list(harness: &Harness, query: String) -> Request<Body> {
        Request::get(format!("/meetings?{query}"))
            .header(ACTOR_HEADER, harness.actor_id.to_string())
            .body(Body::empty())
            .unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_the_page_and_total(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        harness.draft("one").await;
        harness.active("two").await;

        let response = app(&harness)
            .oneshot(list(&harness, format!("org_id={}&is_active=false", harness.org_id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["page"], 1);
        assert_eq!(json["page_size"], 20);
        assert_eq!(json["meetings"][0]["purpose"], "one");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_422_without_an_org(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let response = app(&harness).oneshot(list(&harness, "page=1".into())).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_422_for_page_zero(#[future(awt)] before_each: Harness) {
        let harness = before_each;
        let response = app(&harness)
            .oneshot(list(&harness, format!("org_id={}&page=0", harness.org_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
