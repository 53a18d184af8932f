//! Tracing subscriber setup for the driver.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber.
///
/// Filtering follows `RUST_LOG` (for example `RUST_LOG=mpgen_schema=trace`).
/// With `tree`, spans are rendered as an indented call tree, and the filter
/// defaults to debug output of the engine when `RUST_LOG` is unset. Without
/// either, nothing is installed. Safe to call multiple times.
pub fn init_tracing(tree: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let from_env = std::env::var("RUST_LOG").is_ok();
        if !from_env && !tree {
            return;
        }
        let filter = if from_env {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new("mpgen_schema=debug,mpgenc=debug")
        };

        if tree {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
