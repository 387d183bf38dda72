//! Tracing setup for the command-line front end.
//!
//! Library code only emits `tracing` events; the binary decides where they go.

use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Install the global subscriber, writing to stderr.
///
/// `default_level` applies unless `RUST_LOG` is set. Later calls are ignored.
pub fn init_tracing(default_level: &str) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("sigscan={}", default_level)));

        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}
