//! Structured logging via `tracing`.
//!
//! Library code only emits events (`tracing::info!`, `tracing::debug!`).
//! Binaries decide whether to install a subscriber by calling
//! [`init_structured_logging`] once at startup.

/// Install the global JSON subscriber writing to stderr.
///
/// Filtering follows `RUST_LOG` (e.g. `RUST_LOG=wayfinder_search=debug`).
/// Stdout is left untouched so fixture output stays machine-parseable.
///
/// Returns `false` if a global subscriber was already installed; the
/// existing one is kept.
pub fn init_structured_logging() -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
