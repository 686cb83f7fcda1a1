use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "STREAMSTATS_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr subscriber so report output on stdout stays clean.
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
