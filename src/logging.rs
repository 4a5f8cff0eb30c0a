//! Tracing setup. Respects `RUST_LOG` for filtering and defaults to `info`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .init();
}
