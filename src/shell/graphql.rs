// GraphQL surface: one merged root per operation kind, each use case contributing
// its own object. The acting identity travels as request data.

use async_graphql::http::{ALL_WEBSOCKET_PROTOCOLS, GraphiQLSource};
use async_graphql::{
    Context, Data, Error, ErrorExtensions, ID, MergedObject, MergedSubscription, Schema,
    SimpleObject,
};
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::{
    Extension, Router,
    extract::WebSocketUpgrade,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::meetings::application::context::RequestOrigin;
use crate::modules::meetings::application::errors::MeetingError;
use crate::modules::meetings::core::views::{CostView, MeetingView, ParticipantView};
use crate::modules::meetings::use_cases::create_meeting::inbound::graphql::CreateMeetingMutation;
use crate::modules::meetings::use_cases::delete_meeting::inbound::graphql::DeleteMeetingMutation;
use crate::modules::meetings::use_cases::get_meeting::inbound::graphql::GetMeetingQuery;
use crate::modules::meetings::use_cases::get_meeting_cost::inbound::graphql::GetMeetingCostQuery;
use crate::modules::meetings::use_cases::list_meetings::inbound::graphql::ListMeetingsQuery;
use crate::modules::meetings::use_cases::participation::inbound::graphql::{
    ParticipationMutation, ParticipationQuery,
};
use crate::modules::meetings::use_cases::start_meeting::inbound::graphql::StartMeetingMutation;
use crate::modules::meetings::use_cases::stop_meeting::inbound::graphql::StopMeetingMutation;
use crate::modules::meetings::use_cases::subscribe_to_meeting::inbound::graphql::MeetingSubscription;
use crate::modules::meetings::use_cases::update_meeting::inbound::graphql::UpdateMeetingMutation;
use crate::shell::http::{actor_from, request_origin, status_of};
use crate::shell::state::AppState;

pub const ENDPOINT: &str = "/gql";
pub const WS_ENDPOINT: &str = "/gql/ws";

#[derive(MergedObject, Default)]
pub struct QueryRoot(GetMeetingQuery, ListMeetingsQuery, GetMeetingCostQuery, ParticipationQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    CreateMeetingMutation,
    StartMeetingMutation,
    StopMeetingMutation,
    UpdateMeetingMutation,
    DeleteMeetingMutation,
    ParticipationMutation,
);

#[derive(MergedSubscription, Default)]
pub struct SubscriptionRoot(MeetingSubscription);

pub type AppSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), SubscriptionRoot::default())
        .data(state)
        .finish()
}

/// Who is calling, attached per request or per websocket connection.
#[derive(Debug, Clone)]
pub struct Acting {
    pub actor_id: Uuid,
    pub origin: RequestOrigin,
}

pub fn acting_as(context: &Context<'_>) -> async_graphql::Result<(Uuid, RequestOrigin)> {
    context
        .data_opt::<Acting>()
        .map(|acting| (acting.actor_id, acting.origin.clone()))
        .ok_or_else(|| {
            Error::new("missing actor").extend_with(|_, e| e.set("code", "UNAUTHENTICATED"))
        })
}

pub fn parse_id(id: &ID) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str())
        .map_err(|_| {
            Error::new(format!("malformed id {}", id.as_str()))
                .extend_with(|_, e| e.set("code", "VALIDATION"))
        })
}

pub fn to_gql_error(error: MeetingError) -> Error {
    if status_of(&error).is_server_error() {
        tracing::error!(error = %error, source = ?std::error::Error::source(&error), "graphql request failed");
    }
    let code = error.code();
    Error::new(error.to_string()).extend_with(|_, e| e.set("code", code))
}

#[derive(SimpleObject)]
pub struct GqlMeeting {
    pub id: ID,
    pub org_id: ID,
    pub purpose: String,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub total_cost: f64,
    pub total_duration_seconds: i64,
    pub max_attendees: u32,
    pub created_at: DateTime<Utc>,
}

impl From<MeetingView> for GqlMeeting {
    fn from(view: MeetingView) -> Self {
        Self {
            id: ID(view.id.to_string()),
            org_id: ID(view.org_id.to_string()),
            purpose: view.purpose,
            started_at: view.started_at,
            stopped_at: view.stopped_at,
            is_active: view.is_active,
            total_cost: view.total_cost,
            total_duration_seconds: view.total_duration_seconds,
            max_attendees: view.max_attendees,
            created_at: view.created_at,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlCost {
    pub total_cost: f64,
    pub total_duration_seconds: i64,
    pub cost_per_second: f64,
    pub cost_per_minute: f64,
    pub cost_per_hour: f64,
}

impl From<CostView> for GqlCost {
    fn from(cost: CostView) -> Self {
        Self {
            total_cost: cost.total_cost,
            total_duration_seconds: cost.total_duration_seconds,
            cost_per_second: cost.cost_per_second,
            cost_per_minute: cost.cost_per_minute,
            cost_per_hour: cost.cost_per_hour,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlParticipant {
    pub person_id: ID,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

impl From<ParticipantView> for GqlParticipant {
    fn from(view: ParticipantView) -> Self {
        Self {
            person_id: ID(view.person_id.to_string()),
            joined_at: view.joined_at,
            left_at: view.left_at,
        }
    }
}

fn acting_from(headers: &HeaderMap) -> Option<Acting> {
    actor_from(headers).map(|actor_id| Acting {
        actor_id,
        origin: request_origin(headers),
    })
}

async fn graphql(
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(acting) = acting_from(&headers) {
        request = request.data(acting);
    }
    schema.execute(request).await.into()
}

async fn graphql_ws(
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    protocol: GraphQLProtocol,
    upgrade: WebSocketUpgrade,
) -> Response {
    let mut data = Data::default();
    if let Some(acting) = acting_from(&headers) {
        data.insert(acting);
    }
    upgrade
        .protocols(ALL_WEBSOCKET_PROTOCOLS)
        .on_upgrade(move |stream| {
            GraphQLWebSocket::new(stream, schema, protocol)
                .with_data(data)
                .serve()
        })
        .into_response()
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(ENDPOINT).subscription_endpoint(WS_ENDPOINT).finish())
}

pub fn routes(schema: AppSchema) -> Router {
    Router::new()
        .route(ENDPOINT, get(graphiql).post(graphql))
        .route(WS_ENDPOINT, get(graphql_ws))
        .layer(Extension(schema))
}
