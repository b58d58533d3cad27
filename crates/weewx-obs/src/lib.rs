use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn,weex_aggregate=info,weex_db=info";

/// Initialize logging.
/// - JSON logs on stderr, keeping stdout for command output
/// - RUST_LOG respected; defaults to [`DEFAULT_FILTER`]
pub fn init(service_name: &str) {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    tracing::debug!(service = %service_name, "Logging initialized");
}

fn env_filter() -> EnvFilter {
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
