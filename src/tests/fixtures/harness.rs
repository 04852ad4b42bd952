// Fully wired meeting engine on in-memory adapters, driven by a manual clock.
//
// The actor holds every meeting activity in the org; the outsider holds none.

use std::sync::Arc;
use std::time::Duration;

use rstest::fixture;
use uuid::Uuid;

use crate::modules::meetings::adapters::outbound::ledger_in_memory::InMemoryLedger;
use crate::modules::meetings::application::context::{RequestContext, RetryPolicy};
use crate::modules::meetings::application::deps::{EngineSettings, MeetingDeps, RESOURCE_KIND};
use crate::modules::meetings::application::errors::MeetingError;
use crate::modules::meetings::core::events::EventEnvelope;
use crate::modules::meetings::core::keys::meeting_topic;
use crate::modules::meetings::core::views::{MeetingView, ParticipantView};
use crate::modules::meetings::use_cases::delete_meeting::command::DeleteMeeting;
use crate::modules::meetings::use_cases::get_meeting::query::GetMeeting;
use crate::modules::meetings::use_cases::participation::command::{JoinMeeting, LeaveMeeting};
use crate::modules::meetings::use_cases::start_meeting::command::StartMeeting;
use crate::modules::meetings::use_cases::stop_meeting::command::StopMeeting;
use crate::modules::meetings::use_cases::update_meeting::command::UpdateMeeting;
use crate::shared::core::clock::ManualClock;
use crate::shared::core::primitives::Money;
use crate::shared::infrastructure::audit::in_memory::InMemoryAuditSink;
use crate::shared::infrastructure::cache::in_memory::InMemoryCache;
use crate::shared::infrastructure::event_bus::in_memory::InMemoryEventBus;
use crate::shared::infrastructure::event_bus::{BusSubscription, EventBus};
use crate::shared::infrastructure::oracle::in_memory::InMemoryOracle;
use crate::shell::state::AppState;
use crate::tests::fixtures::commands::CreateMeetingBuilder;
use crate::tests::fixtures::meetings::fixed_now;

pub struct Harness {
    pub app: AppState,
    pub deps: MeetingDeps,
    pub clock: Arc<ManualClock>,
    pub ledger: InMemoryLedger,
    pub cache: Arc<InMemoryCache>,
    pub bus: Arc<InMemoryEventBus>,
    pub oracle: Arc<InMemoryOracle>,
    pub audit: Arc<InMemoryAuditSink>,
    pub org_id: Uuid,
    pub actor_id: Uuid,
    pub outsider_id: Uuid,
}

pub fn test_settings() -> EngineSettings {
    EngineSettings {
        ledger_timeout: Duration::from_secs(5),
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        },
        ..EngineSettings::default()
    }
}

#[fixture]
pub async fn before_each() -> Harness {
    Harness::with_clock(Arc::new(ManualClock::new(fixed_now()))).await
}

#[allow(dead_code)]
impl Harness {
    pub async fn with_clock(clock: Arc<ManualClock>) -> Self {
        Self::build(clock, test_settings()).await
    }

    pub async fn build(clock: Arc<ManualClock>, settings: EngineSettings) -> Self {
        let ledger = InMemoryLedger::new();
        let cache = Arc::new(InMemoryCache::new(clock.clone()));
        let bus = Arc::new(InMemoryEventBus::new(64));
        let oracle = Arc::new(InMemoryOracle::new(0.0));
        let audit = Arc::new(InMemoryAuditSink::new());

        let org_id = Uuid::now_v7();
        let actor_id = Uuid::now_v7();
        oracle.grant_all(actor_id, org_id, RESOURCE_KIND).await;

        let deps = MeetingDeps::new(
            Arc::new(ledger.clone()),
            cache.clone(),
            bus.clone(),
            oracle.clone(),
            oracle.clone(),
            audit.clone(),
            clock.clone(),
            settings,
        );

        Self {
            app: AppState::new(deps.clone()),
            deps,
            clock,
            ledger,
            cache,
            bus,
            oracle,
            audit,
            org_id,
            actor_id,
            outsider_id: Uuid::now_v7(),
        }
    }

    pub fn context(&self) -> RequestContext {
        RequestContext::default()
    }

    pub async fn draft(&self, purpose: &str) -> MeetingView {
        let command = CreateMeetingBuilder::new()
            .org(self.org_id)
            .actor(self.actor_id)
            .purpose(purpose)
            .build();
        self.app.create_meeting.handle(&self.context(), command).await.unwrap()
    }

    pub async fn active(&self, purpose: &str) -> MeetingView {
        let draft = self.draft(purpose).await;
        self.start(draft.id).await
    }

    pub async fn stopped(&self, purpose: &str) -> MeetingView {
        let active = self.active(purpose).await;
        self.app
            .stop_meeting
            .handle(&self.context(), self.stop_command(active.id))
            .await
            .unwrap()
    }

    pub async fn start(&self, meeting_id: Uuid) -> MeetingView {
        self.app
            .start_meeting
            .handle(&self.context(), self.start_command(meeting_id))
            .await
            .unwrap()
    }

    pub async fn get(&self, meeting_id: Uuid) -> MeetingView {
        self.app
            .get_meeting
            .handle(&self.context(), self.get_query(meeting_id))
            .await
            .unwrap()
    }

    pub async fn set_attendees(&self, meeting_id: Uuid, count: u32) -> MeetingView {
        self.update(UpdateMeeting::attendee_count(meeting_id, self.actor_id, count)).await
    }

    pub async fn set_wage(&self, meeting_id: Uuid, wage: Money) -> MeetingView {
        self.update(UpdateMeeting::average_wage(meeting_id, self.actor_id, wage)).await
    }

    pub async fn set_purpose(&self, meeting_id: Uuid, purpose: &str) -> MeetingView {
        self.update(UpdateMeeting::purpose(meeting_id, self.actor_id, purpose)).await
    }

    async fn update(&self, command: UpdateMeeting) -> MeetingView {
        self.app.update_meeting.handle(&self.context(), command).await.unwrap()
    }

    pub async fn join(
        &self,
        meeting_id: Uuid,
        person_id: Uuid,
    ) -> Result<ParticipantView, MeetingError> {
        let command = JoinMeeting {
            meeting_id,
            person_id,
            actor_id: self.actor_id,
            origin: Default::default(),
        };
        self.app.participation.join(&self.context(), command).await
    }

    pub async fn leave(
        &self,
        meeting_id: Uuid,
        person_id: Uuid,
    ) -> Result<ParticipantView, MeetingError> {
        let command = LeaveMeeting {
            meeting_id,
            person_id,
            actor_id: self.actor_id,
            origin: Default::default(),
        };
        self.app.participation.leave(&self.context(), command).await
    }

    pub fn start_command(&self, meeting_id: Uuid) -> StartMeeting {
        StartMeeting {
            meeting_id,
            actor_id: self.actor_id,
            origin: Default::default(),
        }
    }

    pub fn stop_command(&self, meeting_id: Uuid) -> StopMeeting {
        StopMeeting {
            meeting_id,
            actor_id: self.actor_id,
            origin: Default::default(),
        }
    }

    pub fn delete_command(&self, meeting_id: Uuid) -> DeleteMeeting {
        DeleteMeeting {
            meeting_id,
            actor_id: self.actor_id,
            origin: Default::default(),
        }
    }

    pub fn get_query(&self, meeting_id: Uuid) -> GetMeeting {
        GetMeeting {
            meeting_id,
            actor_id: self.actor_id,
        }
    }

    pub async fn subscribe(&self, meeting_id: Uuid) -> Box<dyn BusSubscription> {
        self.bus.subscribe(&meeting_topic(meeting_id)).await.unwrap()
    }

    pub async fn next_envelope(
        &self,
        subscription: &mut Box<dyn BusSubscription>,
    ) -> EventEnvelope {
        let frame = tokio::time::timeout(Duration::from_secs(1), subscription.recv())
            .await
            .expect("no event within a second")
            .unwrap()
            .unwrap();
        serde_json::from_str(&frame).unwrap()
    }
}
