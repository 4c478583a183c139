//! Tracing setup for Lambda functions built on this crate.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a JSON-formatted tracing subscriber suitable for CloudWatch Logs.
///
/// Call once from the Lambda `main` before handing control to the runtime.
/// The level is taken from `RUST_LOG` and defaults to `info`. Calling this
/// again after a subscriber is installed is a no-op, so tests that share a
/// process may call it freely.
///
/// # Example
///
/// ```no_run
/// eventgate::init_tracing();
/// ```
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Flattened JSON events keep CloudWatch Insights queries flat too.
    let json_layer = fmt::layer()
        .json()
        .flatten_event(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn repeated_initialization_is_harmless() {
        init_tracing();
        init_tracing();
    }
}
