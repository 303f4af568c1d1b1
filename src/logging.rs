// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Logging Setup

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset, empty or unparseable.
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Filter for the given `RUST_LOG` value. Valid directives replace the
/// default entirely, so `debug` enables the engine's per-step events.
pub fn filter_for(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the fmt subscriber with a filter read from `RUST_LOG`.
pub fn init() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(directives.as_deref()))
        .init();
}
