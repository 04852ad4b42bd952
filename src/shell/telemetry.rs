use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG` wins over the configured default directive.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    fmt().with_env_filter(filter).with_target(false).init();
}
