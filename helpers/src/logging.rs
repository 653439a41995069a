//! Diagnostic tracing for the helpers CLI.
//!
//! Function results go to stdout; tracing output goes to stderr so it never
//! mixes with a JSON result.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; falls back to `default_filter` (from config) if unset
/// or invalid. Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=helpers=debug helpers object-filter-keys '{"a": 1}' --key a
/// ```
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
