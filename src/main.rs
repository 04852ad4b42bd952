use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use meeting_costs::shell::config::AppConfig;
use meeting_costs::shell::graphql::{self, ENDPOINT, build_schema};
use meeting_costs::shell::http::router;
use meeting_costs::shell::telemetry::init_tracing;
use meeting_costs::shell::wire_in_memory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("reading configuration")?;
    init_tracing(&config.log_directive);

    let state = wire_in_memory(&config);
    let schema = build_schema(state.clone());

    let app = router(state)
        .merge(graphql::routes(schema))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "meeting costs API listening");
    tracing::info!("GraphQL endpoint: http://{}{}", config.bind_addr, ENDPOINT);
    axum::serve(listener, app).await?;
    Ok(())
}
