// Composition root for the meetings context.
//
// Responsibilities
// - Read configuration from the environment.
// - Instantiate the in-memory infrastructure behind its ports.
// - Wire the ports into the use case handlers.
// - Expose the handlers over HTTP, websocket and GraphQL.

pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
pub mod telemetry;

use std::sync::Arc;

use crate::modules::meetings::adapters::outbound::ledger_in_memory::InMemoryLedger;
use crate::modules::meetings::application::deps::MeetingDeps;
use crate::shared::core::clock::SystemClock;
use crate::shared::infrastructure::audit::tracing_sink::TracingAuditSink;
use crate::shared::infrastructure::cache::in_memory::InMemoryCache;
use crate::shared::infrastructure::event_bus::in_memory::InMemoryEventBus;
use crate::shared::infrastructure::oracle::cached::CachingPermissionOracle;
use crate::shared::infrastructure::oracle::in_memory::InMemoryOracle;
use crate::shell::config::AppConfig;
use crate::shell::state::AppState;

/// Handlers backed by in-memory adapters. The oracle starts without grants.
pub fn wire_in_memory(config: &AppConfig) -> AppState {
    let clock = Arc::new(SystemClock::new());
    let cache = Arc::new(InMemoryCache::new(clock.clone()));
    let oracle = Arc::new(InMemoryOracle::new(config.default_wage));
    let permissions = Arc::new(CachingPermissionOracle::new(
        oracle.clone(),
        cache.clone(),
        config.permission_cache_ttl,
    ));

    let deps = MeetingDeps::new(
        Arc::new(InMemoryLedger::new()),
        cache,
        Arc::new(InMemoryEventBus::new(config.bus_capacity)),
        permissions,
        oracle,
        Arc::new(TracingAuditSink),
        clock,
        config.engine,
    );
    AppState::new(deps)
}
