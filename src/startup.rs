use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// The filter is read from `RUST_LOG` and defaults to `info` when unset or
/// invalid.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
