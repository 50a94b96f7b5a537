use anyhow::Context;

use tracing::subscriber::set_global_default;

use tracing_log::LogTracer;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber for the service.
///
/// The filter honors `RUST_LOG` when set and falls back to `default_filter`
/// otherwise, so the request spans around the subscription endpoints are
/// visible out of the box. Spans are logged on close only, which is where
/// their timing is.
pub fn init(default_filter: &str) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_span_events(FmtSpan::CLOSE)
        .finish();

    // Redirect `log` records (sqlx, actix internals) into tracing
    LogTracer::init().context("Failed to initialize log forwarding")?;

    set_global_default(subscriber).context("Failed to set global subscriber")
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}
