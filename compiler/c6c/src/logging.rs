//! Tracing subscriber setup for the binary.

use std::sync::Once;

/// Environment variable with the log filter, e.g. `C6_LOG=c6_parse=debug`.
/// `RUST_LOG` is used when it is not set.
pub const LOG_ENV: &str = "C6_LOG";

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical stderr subscriber if a filter is configured.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let Ok(directives) = std::env::var(LOG_ENV).or_else(|_| std::env::var("RUST_LOG")) else {
            return;
        };
        let layer = tracing_tree::HierarchicalLayer::new(2)
            .with_targets(true)
            .with_bracketed_fields(true);
        tracing_subscriber::registry()
            .with(EnvFilter::new(directives))
            .with(layer)
            .init();
    });
}
