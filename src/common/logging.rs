//! Logging and tracing configuration
//!
//! Console output belongs to the test report, so diagnostics go to stderr
//! and stay quiet unless `RUST_LOG` asks for more.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "softsync_tester=warn,warn";

/// Initialize tracing for the CLI (stderr logging)
///
/// `-v` raises this crate to debug, `-vv` to trace. `RUST_LOG` wins over both.
pub fn init_cli(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    // try_init: tests and embedders may already have installed a subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => DEFAULT_FILTER,
        1 => "softsync_tester=debug,warn",
        _ => "softsync_tester=trace,info",
    }
}
