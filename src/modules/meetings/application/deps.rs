// Collaborators shared by every meeting use case handler, plus the steps all
// mutating paths have in common: authorize, run ledger work under the retry and
// deadline policy, then invalidate and publish once committed.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::modules::meetings::adapters::outbound::event_publisher::publish_event;
use crate::modules::meetings::adapters::outbound::ledger::LedgerStore;
use crate::modules::meetings::adapters::outbound::meeting_reader::MeetingReader;
use crate::modules::meetings::application::context::{
    RequestContext, RequestOrigin, RetryPolicy, bounded, with_retry,
};
use crate::modules::meetings::application::errors::{MeetingError, ledger_err};
use crate::modules::meetings::application::ordering::{PublishGates, PublishTicket};
use crate::modules::meetings::core::events::MeetingEvent;
use crate::modules::meetings::core::meeting::Meeting;
use crate::shared::core::clock::Clock;
use crate::shared::infrastructure::audit::{AuditEntry, AuditSink, dispatch};
use crate::shared::infrastructure::cache::Cache;
use crate::shared::infrastructure::event_bus::EventBus;
use crate::shared::infrastructure::oracle::{PermissionOracle, WageSource};

pub const RESOURCE_KIND: &str = "meeting";

pub const ACTIVITY_CREATE: &str = "meeting:create";
pub const ACTIVITY_READ: &str = "meeting:read";
pub const ACTIVITY_LIST: &str = "meeting:list";
pub const ACTIVITY_START: &str = "meeting:start";
pub const ACTIVITY_UPDATE: &str = "meeting:update";
pub const ACTIVITY_STOP: &str = "meeting:stop";
pub const ACTIVITY_DELETE: &str = "meeting:delete";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub ledger_timeout: Duration,
    pub retry: RetryPolicy,
    pub meeting_cache_ttl: Duration,
    pub increments_cache_ttl: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ledger_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            meeting_cache_ttl: Duration::from_secs(15 * 60),
            increments_cache_ttl: Duration::from_secs(15 * 60),
        }
    }
}

#[derive(Clone)]
pub struct MeetingDeps {
    pub ledger: Arc<dyn LedgerStore>,
    pub reader: Arc<MeetingReader>,
    pub bus: Arc<dyn EventBus>,
    pub oracle: Arc<dyn PermissionOracle>,
    pub wages: Arc<dyn WageSource>,
    pub audit: Arc<dyn AuditSink>,
    pub clock: Arc<dyn Clock>,
    pub settings: EngineSettings,
    gates: Arc<PublishGates>,
}

impl MeetingDeps {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        cache: Arc<dyn Cache>,
        bus: Arc<dyn EventBus>,
        oracle: Arc<dyn PermissionOracle>,
        wages: Arc<dyn WageSource>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        let reader = Arc::new(MeetingReader::new(
            ledger.clone(),
            cache,
            settings.meeting_cache_ttl,
            settings.increments_cache_ttl,
        ));
        Self {
            ledger,
            reader,
            bus,
            oracle,
            wages,
            audit,
            clock,
            settings,
            gates: Arc::new(PublishGates::new()),
        }
    }

    pub async fn authorize(
        &self,
        actor_id: Uuid,
        org_id: Uuid,
        meeting_id: Option<Uuid>,
        activity: &'static str,
    ) -> Result<(), MeetingError> {
        let allowed = self
            .oracle
            .may(actor_id, org_id, RESOURCE_KIND, meeting_id, activity)
            .await
            .map_err(|e| MeetingError::from_oracle(activity, e))?;
        if !allowed {
            tracing::info!(%actor_id, %org_id, ?meeting_id, %activity, "permission denied");
            return Err(MeetingError::Forbidden { actor_id, activity });
        }
        Ok(())
    }

    /// Reads the meeting through the cache. Only org membership is taken from it;
    /// transitions re-read the row under lock.
    pub async fn load_meeting(
        &self,
        context: &RequestContext,
        operation: &'static str,
        meeting_id: Uuid,
    ) -> Result<Meeting, MeetingError> {
        self.with_ledger(context, operation, || async move {
            self.reader
                .meeting(meeting_id)
                .await
                .map_err(ledger_err(operation))
        })
        .await
    }

    pub async fn load_authorized(
        &self,
        context: &RequestContext,
        operation: &'static str,
        actor_id: Uuid,
        meeting_id: Uuid,
        activity: &'static str,
    ) -> Result<Meeting, MeetingError> {
        let meeting = self.load_meeting(context, operation, meeting_id).await?;
        self.authorize(actor_id, meeting.org_id, Some(meeting.id), activity)
            .await?;
        Ok(meeting)
    }

    /// Runs one ledger unit of work per attempt under the deadline, retrying
    /// transient failures.
    pub async fn with_ledger<T, F, Fut>(
        &self,
        context: &RequestContext,
        operation: &'static str,
        mut attempt: F,
    ) -> Result<T, MeetingError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, MeetingError>>,
    {
        let deadline = self.settings.ledger_timeout;
        with_retry(context, operation, self.settings.retry, || {
            bounded(context, operation, deadline, attempt())
        })
        .await
    }

    /// Taken right after the meeting row is locked and handed to `after_commit`.
    pub async fn publish_ticket(&self, meeting_id: Uuid) -> PublishTicket {
        self.gates.enter(meeting_id).await
    }

    /// Cache invalidation always follows a commit. The event is dropped when the
    /// request was cancelled after the commit. The ticket is released once the
    /// event is out.
    pub async fn after_commit(
        &self,
        context: &RequestContext,
        _ticket: PublishTicket,
        meeting_id: Uuid,
        event: Option<MeetingEvent>,
    ) {
        self.reader.invalidate(meeting_id).await;
        let Some(event) = event else {
            return;
        };
        if context.is_cancelled() {
            tracing::debug!(%meeting_id, event_type = %event.event_type().as_str(), "request cancelled after commit, event dropped");
            return;
        }
        publish_event(self.bus.as_ref(), meeting_id, event).await;
    }

    pub fn audit(
        &self,
        action: &str,
        actor_id: Uuid,
        meeting: &Meeting,
        details: Option<serde_json::Value>,
        origin: &RequestOrigin,
    ) {
        dispatch(
            self.audit.clone(),
            AuditEntry {
                actor_id: Some(actor_id),
                org_id: Some(meeting.org_id),
                action: action.to_string(),
                resource_kind: RESOURCE_KIND.to_string(),
                resource_id: meeting.id,
                details,
                ip: origin.ip.clone(),
                user_agent: origin.user_agent.clone(),
                at: self.clock.now(),
            },
        );
    }
}
