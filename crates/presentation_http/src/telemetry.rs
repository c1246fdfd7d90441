//! Log filter used by the server binary

use tracing_subscriber::EnvFilter;

/// Directives applied when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str =
    "info,faultline_server=debug,presentation_http=debug,tower_http=debug";

/// Filter from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
