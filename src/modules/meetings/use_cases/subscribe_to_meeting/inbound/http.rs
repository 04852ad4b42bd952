use async_trait::async_trait;
use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt, stream::SplitSink};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::modules::meetings::application::context::RequestContext;
use crate::modules::meetings::use_cases::subscribe_to_meeting::query::SubscribeToMeeting;
use crate::modules::meetings::use_cases::subscribe_to_meeting::stream::{
    EventSink, MeetingEventStream, SinkError,
};
use crate::shell::http::Actor;
use crate::shell::state::AppState;

struct WebSocketSink(SplitSink<WebSocket, Message>);

#[async_trait]
impl EventSink for WebSocketSink {
    async fn send(&mut self, frame: String) -> Result<(), SinkError> {
        self.0
            .send(Message::Text(frame.into()))
            .await
            .map_err(|_| SinkError::Disconnected)
    }
}

/// Authorizes before the upgrade so refusals are plain HTTP errors.
pub async fn handle(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Path(meeting_id): Path<Uuid>,
    upgrade: WebSocketUpgrade,
) -> Response {
    let query = SubscribeToMeeting { meeting_id, actor_id };
    match state.subscribe_to_meeting.handle(&RequestContext::default(), query).await {
        Ok(stream) => upgrade.on_upgrade(move |socket| serve(socket, stream)),
        Err(error) => error.into_response(),
    }
}

async fn serve(socket: WebSocket, stream: MeetingEventStream) {
    let (sender, mut receiver) = socket.split();
    let cancel = CancellationToken::new();

    // Inbound frames are ignored; the read side only tells us when the peer is gone.
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            while let Some(Ok(message)) = receiver.next().await {
                if matches!(message, Message::Close(_)) {
                    break;
                }
            }
            cancel.cancel();
        })
    };

    let meeting_id = stream.meeting_id();
    let end = stream.pump(&mut WebSocketSink(sender), &cancel).await;
    watcher.abort();
    tracing::debug!(%meeting_id, ?end, "websocket subscriber finished");
}
