//! Tracing setup
//!
//! `RUST_LOG` takes precedence. Without it, the debug flag (see
//! [`ClientConfig::debug`](crate::ClientConfig)) picks between `debug` and
//! `info` for this crate.

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "oslc_client=debug"
    } else {
        "oslc_client=info"
    }
}

/// Install a global fmt subscriber
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
