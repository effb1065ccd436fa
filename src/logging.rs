//! Tracing setup.
//!
//! Library code only emits `tracing` events. Hosts that don't install their
//! own subscriber can call [`init_tracing`].

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `debug` sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("dotenv_gate=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dotenv_gate=info"))
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}
