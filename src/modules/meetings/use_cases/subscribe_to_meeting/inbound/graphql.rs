use async_graphql::{Context, ID, Json, SimpleObject, Subscription};
use futures::{Stream, StreamExt, stream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::core::events::EventEnvelope;
use crate::modules::meetings::use_cases::subscribe_to_meeting::query::SubscribeToMeeting;
use crate::modules::meetings::use_cases::subscribe_to_meeting::stream::ChannelSink;
use crate::shell::graphql::{acting_as, parse_id, to_gql_error};
use crate::shell::state::AppState;

const BUFFERED_FRAMES: usize = 32;

#[derive(SimpleObject)]
pub struct GqlMeetingEvent {
    pub event_type: String,
    pub meeting_id: String,
    pub payload: Json<serde_json::Value>,
}

impl From<EventEnvelope> for GqlMeetingEvent {
    fn from(envelope: EventEnvelope) -> Self {
        Self {
            event_type: envelope.event_type.as_str().to_string(),
            meeting_id: envelope.meeting_id.to_string(),
            payload: Json(envelope.payload),
        }
    }
}

#[derive(Default)]
pub struct MeetingSubscription;

#[Subscription]
impl MeetingSubscription {
    async fn meeting_events(
        &self,
        context: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<impl Stream<Item = GqlMeetingEvent>> {
        let state = context.data_unchecked::<AppState>();
        let (actor_id, _) = acting_as(context)?;
        let query = SubscribeToMeeting {
            meeting_id: parse_id(&id)?,
            actor_id,
        };
        let events = state
            .subscribe_to_meeting
            .handle(&RequestContext::default(), query)
            .await
            .map_err(to_gql_error)?;

        // Dropping the client stream drops the guard, which ends the pump.
        let cancel = CancellationToken::new();
        let guard = cancel.clone().drop_guard();
        let (sender, receiver) = mpsc::channel(BUFFERED_FRAMES);
        tokio::spawn(async move { events.pump(&mut ChannelSink(sender), &cancel).await });

        let frames = stream::unfold((receiver, guard), |(mut receiver, guard)| async move {
            let frame = receiver.recv().await?;
            Some((frame, (receiver, guard)))
        });
        Ok(frames.filter_map(|frame| async move {
            match serde_json::from_str::<EventEnvelope>(&frame) {
                Ok(envelope) => Some(GqlMeetingEvent::from(envelope)),
                Err(error) => {
                    tracing::warn!(%error, "dropping undecodable event frame");
                    None
                }
            }
        }))
    }
}
