use tracing_subscriber::{prelude::*, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "bridge_instruction=info,burn_proof=info";

/// Installs plain-text logging filtered by `RUST_LOG`, or by
/// [`DEFAULT_FILTER`] when the variable is unset or unparsable.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_filter(filter),
        )
        .init();
}
